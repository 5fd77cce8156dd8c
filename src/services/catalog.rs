// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only restaurant, event and booking catalog.
//!
//! The catalog is compiled in and built once on first use.

use crate::models::{Booking, City, Coordinates, Event, Location, Restaurant};
use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Optional restaurant list filters. Matching is case-insensitive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantFilter {
    pub city: Option<String>,
    pub cuisine: Option<String>,
}

impl RestaurantFilter {
    fn matches(&self, r: &Restaurant) -> bool {
        let city_ok = self
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map_or(true, |c| r.location.city.eq_ignore_ascii_case(c));
        let cuisine_ok = self
            .cuisine
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map_or(true, |c| r.cuisine.iter().any(|x| x.eq_ignore_ascii_case(c)));
        city_ok && cuisine_ok
    }
}

/// Bookable times, split by service.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSlots {
    pub lunch: Vec<&'static str>,
    pub dinner: Vec<&'static str>,
}

impl TimeSlots {
    pub fn contains(&self, time: &str) -> bool {
        self.lunch.iter().chain(&self.dinner).any(|t| *t == time)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Floor {
    pub name: &'static str,
    pub tables: Vec<String>,
}

/// Table ids per floor.
#[derive(Debug, Clone, Serialize)]
pub struct TableLayout {
    pub floors: Vec<Floor>,
}

impl TableLayout {
    pub fn contains(&self, table: &str) -> bool {
        self.floors
            .iter()
            .any(|f| f.tables.iter().any(|t| t == table))
    }
}

const LUNCH_SLOTS: [&str; 6] = [
    "11:30 AM", "12:00 PM", "12:30 PM", "1:00 PM", "1:30 PM", "2:00 PM",
];

const DINNER_SLOTS: [&str; 8] = [
    "6:00 PM", "6:30 PM", "7:00 PM", "7:30 PM", "8:00 PM", "8:30 PM", "9:00 PM", "9:30 PM",
];

const TABLES_PER_FLOOR: usize = 8;

#[allow(clippy::too_many_arguments)]
fn bangalore_restaurant(
    id: &str,
    name: &str,
    cuisine: [&str; 2],
    address: &str,
    rating: f32,
    image: &str,
    price_level: u8,
    phone_number: &str,
) -> Restaurant {
    Restaurant {
        id: id.to_string(),
        name: name.to_string(),
        location: Location::new("Bangalore", "Karnataka", "India"),
        rating,
        image: image.to_string(),
        cuisine: cuisine.iter().map(|c| c.to_string()).collect(),
        price_level,
        address: address.to_string(),
        open_now: true,
        phone_number: phone_number.to_string(),
    }
}

static RESTAURANTS: LazyLock<Vec<Restaurant>> = LazyLock::new(|| {
    vec![
        bangalore_restaurant(
            "1",
            "Spice Garden",
            ["Indian", "North Indian"],
            "MG Road, Bangalore",
            4.5,
            "https://images.unsplash.com/photo-1517248135467-4c7edcad34c4",
            3,
            "+91-9876543210",
        ),
        bangalore_restaurant(
            "2",
            "The Coastal Kitchen",
            ["Seafood", "Coastal"],
            "Indiranagar, Bangalore",
            4.3,
            "https://images.unsplash.com/photo-1514933651103-005eec06c04b",
            2,
            "+91-9876543211",
        ),
        bangalore_restaurant(
            "3",
            "Biryani House",
            ["Indian", "Biryani"],
            "Koramangala, Bangalore",
            4.7,
            "https://images.unsplash.com/photo-1633945274405-b6c8069047b0",
            2,
            "+91-9876543212",
        ),
        bangalore_restaurant(
            "4",
            "Pizza Paradise",
            ["Italian", "Pizza"],
            "Whitefield, Bangalore",
            4.8,
            "https://images.unsplash.com/photo-1565299624946-b28f40a0ae38",
            2,
            "+91-9876543213",
        ),
        bangalore_restaurant(
            "5",
            "Sushi Master",
            ["Japanese", "Sushi"],
            "UB City, Bangalore",
            4.6,
            "https://images.unsplash.com/photo-1579871494447-9811cf80d66c",
            4,
            "+91-9876543214",
        ),
        bangalore_restaurant(
            "6",
            "Burger Junction",
            ["American", "Burgers"],
            "Marathahalli, Bangalore",
            4.4,
            "https://images.unsplash.com/photo-1568901346375-23c9450c58cd",
            2,
            "+91-9876543215",
        ),
    ]
});

static EVENTS: LazyLock<Vec<Event>> = LazyLock::new(|| {
    vec![
        Event {
            id: "1".to_string(),
            name: "Wine Tasting Evening".to_string(),
            description: "Experience an evening of fine wines from around the world".to_string(),
            date: "2024-03-20".to_string(),
            time: "19:00".to_string(),
            location: "Wine Cellar, Downtown".to_string(),
            image: "https://images.unsplash.com/photo-1510812431401-41d2bd2722f3".to_string(),
            price: 75,
            category: "Wine & Dine".to_string(),
            organizer: "Wine Enthusiasts Club".to_string(),
            capacity: 30,
            registered_count: 15,
        },
        Event {
            id: "2".to_string(),
            name: "Cooking Masterclass".to_string(),
            description: "Learn to cook authentic Italian dishes with Chef Mario".to_string(),
            date: "2024-03-25".to_string(),
            time: "18:00".to_string(),
            location: "Culinary Institute".to_string(),
            image: "https://images.unsplash.com/photo-1556910103-1c02745aae4d".to_string(),
            price: 120,
            category: "Cooking Class".to_string(),
            organizer: "Culinary Institute".to_string(),
            capacity: 20,
            registered_count: 12,
        },
    ]
});

static BOOKINGS: LazyLock<Vec<Booking>> = LazyLock::new(|| {
    vec![Booking {
        id: 1,
        restaurant_name: "1947".to_string(),
        date: "April 15, 2025".to_string(),
        time: "7:30 PM".to_string(),
        guests: 2,
        status: "Confirmed".to_string(),
    }]
});

static TIME_SLOTS: LazyLock<TimeSlots> = LazyLock::new(|| TimeSlots {
    lunch: LUNCH_SLOTS.to_vec(),
    dinner: DINNER_SLOTS.to_vec(),
});

static TABLE_LAYOUT: LazyLock<TableLayout> = LazyLock::new(|| {
    let floor = |name: &'static str, prefix: char| Floor {
        name,
        tables: (1..=TABLES_PER_FLOOR)
            .map(|i| format!("{}{}", prefix, i))
            .collect(),
    };
    TableLayout {
        floors: vec![
            floor("ground", 'G'),
            floor("first", 'F'),
            floor("second", 'S'),
            floor("third", 'T'),
        ],
    }
});

/// (city, state, lat, lng)
const CITY_TABLE: [(&str, &str, f64, f64); 30] = [
    ("Mumbai", "Maharashtra", 19.0760, 72.8777),
    ("Delhi", "Delhi", 28.7041, 77.1025),
    ("Bangalore", "Karnataka", 12.9716, 77.5946),
    ("Hyderabad", "Telangana", 17.3850, 78.4867),
    ("Chennai", "Tamil Nadu", 13.0827, 80.2707),
    ("Kolkata", "West Bengal", 22.5726, 88.3639),
    ("Pune", "Maharashtra", 18.5204, 73.8567),
    ("Ahmedabad", "Gujarat", 23.0225, 72.5714),
    ("Jaipur", "Rajasthan", 26.9124, 75.7873),
    ("Lucknow", "Uttar Pradesh", 26.8467, 80.9462),
    ("Surat", "Gujarat", 21.1702, 72.8311),
    ("Kanpur", "Uttar Pradesh", 26.4499, 80.3319),
    ("Nagpur", "Maharashtra", 21.1458, 79.0882),
    ("Indore", "Madhya Pradesh", 22.7196, 75.8577),
    ("Thane", "Maharashtra", 19.2183, 72.9781),
    ("Bhopal", "Madhya Pradesh", 23.2599, 77.4126),
    ("Visakhapatnam", "Andhra Pradesh", 17.6868, 83.2185),
    ("Patna", "Bihar", 25.5941, 85.1376),
    ("Vadodara", "Gujarat", 22.3072, 73.1812),
    ("Ghaziabad", "Uttar Pradesh", 28.6692, 77.4538),
    ("Coimbatore", "Tamil Nadu", 11.0168, 76.9558),
    ("Kochi", "Kerala", 9.9312, 76.2673),
    ("Mysore", "Karnataka", 12.2958, 76.6394),
    ("Mangalore", "Karnataka", 12.9141, 74.8560),
    ("Vijayawada", "Andhra Pradesh", 16.5062, 80.6480),
    ("Chandigarh", "Chandigarh", 30.7333, 76.7794),
    ("Dehradun", "Uttarakhand", 30.3165, 78.0322),
    ("Amritsar", "Punjab", 31.6340, 74.8723),
    ("Jammu", "Jammu and Kashmir", 32.7266, 74.8570),
    ("Srinagar", "Jammu and Kashmir", 34.0837, 74.7973),
];

static CITIES: LazyLock<Vec<City>> = LazyLock::new(|| {
    CITY_TABLE
        .iter()
        .map(|&(city, state, lat, lng)| City {
            city: city.to_string(),
            state: state.to_string(),
            country: "India".to_string(),
            coordinates: Coordinates { lat, lng },
        })
        .collect()
});

/// Cities whose name or state contains `query`. A blank query lists all.
pub fn cities(query: Option<&str>) -> Vec<&'static City> {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => CITIES.iter().filter(|c| c.matches(q)).collect(),
        None => CITIES.iter().collect(),
    }
}

/// Closest listed city by great-circle distance.
pub fn nearest_city(at: Coordinates) -> Option<&'static City> {
    let origin = Point::new(at.lng, at.lat);
    let distance_to = |c: &City| {
        Haversine.distance(origin, Point::new(c.coordinates.lng, c.coordinates.lat))
    };
    CITIES
        .iter()
        .min_by(|a, b| distance_to(a).total_cmp(&distance_to(b)))
}

pub fn restaurants(filter: &RestaurantFilter) -> Vec<&'static Restaurant> {
    RESTAURANTS.iter().filter(|r| filter.matches(r)).collect()
}

pub fn restaurant(id: &str) -> Option<&'static Restaurant> {
    RESTAURANTS.iter().find(|r| r.id == id)
}

/// Highest rated first.
pub fn top_rated(limit: usize) -> Vec<&'static Restaurant> {
    let mut all: Vec<&Restaurant> = RESTAURANTS.iter().collect();
    all.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    all.truncate(limit);
    all
}

pub fn events() -> &'static [Event] {
    &EVENTS
}

pub fn event(id: &str) -> Option<&'static Event> {
    EVENTS.iter().find(|e| e.id == id)
}

pub fn bookings() -> &'static [Booking] {
    &BOOKINGS
}

pub fn time_slots() -> &'static TimeSlots {
    &TIME_SLOTS
}

pub fn table_layout() -> &'static TableLayout {
    &TABLE_LAYOUT
}

pub fn is_valid_table(table: &str) -> bool {
    TABLE_LAYOUT.contains(table)
}
