//! Test infrastructure shared by service tests.

mod db;
pub(crate) mod helpers;

pub(crate) use cart_store::MemoryCartStore;
pub(crate) use context::TestContext;
