pub mod coordinate;
pub mod map;
pub mod marker;
pub mod route;

pub trait ExampleData {
    fn example_data() -> Self;
}
