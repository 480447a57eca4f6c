pub mod error;
pub mod forces;
pub mod params;
pub mod scenario;
pub mod spatial;
pub mod states;
pub mod tank;
