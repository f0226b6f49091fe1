pub mod describe;
pub mod mechanisms;
pub mod run;
