pub mod mcp;
pub mod serve;
pub mod validate;
