pub mod delivery_zone;
pub mod food_item;
pub mod order;
pub mod order_item;
pub mod restaurant;
