//! Geodesic helpers for the nearby-stations query

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Rectangular latitude/longitude window enclosing a search radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Flat-Earth bounding box around `(lat, lon)`.
///
/// One degree of latitude spans roughly 111 km; longitude degrees shrink
/// with the cosine of the latitude. The cosine is floored at 0.1 so the
/// window stays finite near the poles. The box is over-inclusive by
/// construction and callers must follow up with a precise distance check.
pub fn bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let dlat = radius_km / 111.0;
    let dlon = radius_km / (111.0 * lat.to_radians().cos().max(0.1));

    BoundingBox {
        min_lat: lat - dlat,
        max_lat: lat + dlat,
        min_lon: lon - dlon,
        max_lon: lon + dlon,
    }
}

/// Great-circle distance between two coordinates, in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
