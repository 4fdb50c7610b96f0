pub mod drink;
pub mod store;

pub use drink::{Drink, Ingredient};
pub use store::{DrinkStore, StoreError};
