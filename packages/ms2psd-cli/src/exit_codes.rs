pub const SUCCESS: i32 = 0;
/// Processing or output writing failed after the inputs were accepted
pub const EXECUTION_ERROR: i32 = 1;
/// Bad arguments or unreadable inputs; matches clap's usage error code
pub const INPUT_ERROR: i32 = 2;
