pub mod allocator;
pub mod commodity;
pub mod company;
pub mod ledger;
pub mod platoon;
pub mod transport;
