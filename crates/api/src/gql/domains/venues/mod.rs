pub mod resolvers;
pub mod types;

pub use resolvers::{VenueMutation, VenueQuery};
