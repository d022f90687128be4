pub mod complementary;
pub mod dead_reckoning;
