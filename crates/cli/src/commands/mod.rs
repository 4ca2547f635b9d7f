pub mod doctor;
pub mod serve;
pub mod tools_cmd;
