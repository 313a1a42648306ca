mod semantics;
mod storage;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use semantics::*;
pub use storage::*;
