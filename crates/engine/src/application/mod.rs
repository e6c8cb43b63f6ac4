mod shared;

pub use shared::SharedMatchingCore;
