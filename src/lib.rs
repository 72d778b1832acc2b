#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;

pub mod errors;
pub mod schema;
pub mod models;
pub mod db;
pub mod password;
pub mod session;
pub mod user;
pub mod verb;
pub mod table;
pub mod results;
pub mod training;

pub use crate::errors::*;
pub use crate::models::*;
