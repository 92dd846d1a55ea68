pub mod destination;
pub mod itinerary;
pub mod tour_guide;
