pub mod raycast_car;
