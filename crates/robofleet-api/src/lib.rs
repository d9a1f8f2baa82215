//! RoboFleet API Server
//!
//! Fleet Registry を HTTP JSON API として公開する。
//!
//! ## Endpoints
//!
//! ### Robots
//! - GET /api/robots?status=&location= - List robots
//! - GET /api/robots/{id} - Get robot
//! - POST /api/robots - Create robot
//! - PUT /api/robots/{id} - Update robot
//! - DELETE /api/robots/{id} - Delete robot
//! - POST /api/robots/{id}/maintenance - Schedule maintenance
//!
//! ### Metrics
//! - GET /api/metrics - Fleet metrics
//! - GET /api/metrics/uptime - Server uptime
//!
//! ### Health
//! - GET / - Service info
//! - GET /api/health - Health check
//! - GET /api/health/live - Liveness
//! - GET /api/health/ready - Readiness
//! - GET /api/health/version - Build info

pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use dto::*;
pub use error::*;
pub use routes::*;
pub use server::*;
pub use state::*;
