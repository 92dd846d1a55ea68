pub mod catalog_service;
pub mod itinerary_generation_service;
pub mod normalization_service;
pub mod rating_service;
pub mod tour_guide_service;
