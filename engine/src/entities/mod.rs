pub mod airport;
pub mod emergency;
pub mod flight;
pub mod world;
