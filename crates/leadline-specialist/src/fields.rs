// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered qualification field lists per property type.
//!
//! The order is the script order: the specialist asks about the first
//! empty field in the list. Extra fields (motivation, liens, rental
//! income, tenant situation) may be captured opportunistically but never
//! gate completeness.

use leadline_core::types::{FieldKey, PropertyType};

/// Required fields for fix & flip properties, in script order.
pub const FIX_FLIP_FIELDS: &[FieldKey] = &[
    FieldKey::OccupancyStatus,
    FieldKey::Condition,
    FieldKey::RepairsNeeded,
    FieldKey::Timeline,
    FieldKey::Access,
    FieldKey::PriceExpectation,
];

/// Required fields for vacant land, in script order.
pub const VACANT_LAND_FIELDS: &[FieldKey] = &[
    FieldKey::Acreage,
    FieldKey::RoadAccess,
    FieldKey::Utilities,
    FieldKey::PriceExpectation,
];

/// Required fields for long-term rentals, in script order.
pub const RENTAL_FIELDS: &[FieldKey] = &[
    FieldKey::RentalStatus,
    FieldKey::Condition,
    FieldKey::Timeline,
    FieldKey::Access,
    FieldKey::PriceExpectation,
];

/// The required field list for a property type.
pub fn required_fields(property_type: PropertyType) -> &'static [FieldKey] {
    match property_type {
        PropertyType::FixFlip => FIX_FLIP_FIELDS,
        PropertyType::VacantLand => VACANT_LAND_FIELDS,
        PropertyType::LongTermRental => RENTAL_FIELDS,
    }
}
