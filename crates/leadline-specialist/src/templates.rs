// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialogue templates per property type.
//!
//! Scripts are immutable static configuration injected into the specialist
//! at construction time. Placeholders: `{name}` (lead first name),
//! `{address}` (property address), `{agent_name}` (assistant display
//! name).

use leadline_core::types::{FieldKey, PropertyType};

use crate::fields;

/// A substring-keyed objection rule: if any keyword matches the lowercased
/// objection text, `response` is the rebuttal.
#[derive(Debug, Clone, Copy)]
pub struct ObjectionRule {
    pub keywords: &'static [&'static str],
    pub response: &'static str,
}

/// The full canned-dialogue script for one property type.
#[derive(Debug, Clone, Copy)]
pub struct SpecialistScript {
    pub property_type: PropertyType,
    pub required: &'static [FieldKey],
    prompts: &'static [(FieldKey, &'static str)],
    pub completion: &'static str,
    pub objections: &'static [ObjectionRule],
    pub generic_objection: &'static str,
    pub decline: &'static str,
    pub initial_outreach: &'static str,
    pub follow_ups: &'static [&'static str],
}

impl SpecialistScript {
    /// The canned question for a qualification field, if this script asks
    /// about it.
    pub fn prompt_for(&self, field: FieldKey) -> Option<&'static str> {
        self.prompts
            .iter()
            .find(|(key, _)| *key == field)
            .map(|(_, prompt)| *prompt)
    }
}

const FIX_FLIP_SCRIPT: SpecialistScript = SpecialistScript {
    property_type: PropertyType::FixFlip,
    required: fields::FIX_FLIP_FIELDS,
    prompts: &[
        (
            FieldKey::OccupancyStatus,
            "Great! I just need a few quick details to see if it's a fit. Is the property at {address} currently vacant, rented, or owner-occupied?",
        ),
        (
            FieldKey::Condition,
            "And how's the condition of the property? Any recent repairs or major issues we should know about?",
        ),
        (
            FieldKey::RepairsNeeded,
            "What would you say are the main things that need attention? (roof, plumbing, electrical, etc.)",
        ),
        (
            FieldKey::Timeline,
            "Perfect! What's your ideal timeline for selling? Are you looking to move quickly or do you have some flexibility?",
        ),
        (
            FieldKey::Access,
            "Good to know. If we move forward, how would a quick walkthrough work - is there a lockbox, or would we set up a time with you?",
        ),
        (
            FieldKey::PriceExpectation,
            "Last question - do you have a ballpark figure in mind for the property? Just helps me see if we're in the same neighborhood.",
        ),
    ],
    completion: "Thanks for all that info, {name}! Based on what you've shared, we may be able to make a fair cash offer. The next step is super simple: we'll do a quick 15-minute call where I can review your property details and give you a cash range. What's easier for you - afternoon or evening this week?",
    objections: &[
        ObjectionRule {
            keywords: &["price", "low offer", "lowball", "worth more"],
            response: "I completely understand, {name}. We always aim to make fair offers based on current market conditions and the property's condition. The great thing about our process is there's no obligation - we can give you a range and you can decide if it makes sense for your situation.",
        },
        ObjectionRule {
            keywords: &["agent", "realtor", "list it"],
            response: "That's definitely an option, {name}! The main difference is we can close in as little as 7 days with cash, no repairs needed, and no agent commissions. But I totally understand if you want to explore all your options first.",
        },
        ObjectionRule {
            keywords: &["think about it", "need time", "need to think"],
            response: "Of course, {name}! This is a big decision. How about we just do a quick 10-minute call so you have all the information? No pressure at all - just want to make sure you know what your options are.",
        },
    ],
    generic_objection: "I hear you, {name}. Let me see if I can address your concerns. Would you be open to a quick call where we can discuss this more? It's much easier to explain over the phone.",
    decline: "No problem at all, {name}! I appreciate you letting me know. If your situation changes in the future, feel free to reach out. Have a great day!",
    initial_outreach: "Hey {name}, I saw you might be the owner of {address} - would you be open to a no-obligation cash offer for the property? Reply STOP to opt out.",
    follow_ups: &[
        "Just checking in, {name} - if you're at all curious what a cash offer might look like for {address}, I'd be happy to get that started. Totally no pressure. Reply STOP to opt out.",
        "Still open to selling {address}? We make fair cash offers and cover closing costs. Let me know if you'd like to chat or want the offer sent over. Reply STOP to opt out.",
        "Hi {name}, this is my final follow-up about {address}. If you're ever interested in a cash offer, feel free to reach out. Thanks! Reply STOP to opt out.",
    ],
};

const VACANT_LAND_SCRIPT: SpecialistScript = SpecialistScript {
    property_type: PropertyType::VacantLand,
    required: fields::VACANT_LAND_FIELDS,
    prompts: &[
        (
            FieldKey::Acreage,
            "Great! To put something together that makes sense, could I ask - do you know roughly how many acres or the lot size of your parcel?",
        ),
        (
            FieldKey::RoadAccess,
            "Perfect! Does it have road access, or is it landlocked? And if there is road access, is it paved or more of a dirt/gravel situation?",
        ),
        (
            FieldKey::Utilities,
            "Got it! Any idea if utilities like water, power, or septic/sewer are nearby or available to the property?",
        ),
        (
            FieldKey::PriceExpectation,
            "Last question - do you have a ballpark of what you're hoping to get for the land? Just helps me see if we're in the same neighborhood.",
        ),
    ],
    completion: "Perfect, thanks for sharing that, {name}. The next step is super simple: we'll do a quick 15-minute call where {agent_name} can review your land details and give you a cash range. What's easier for you - afternoon or evening this week?",
    objections: &[
        ObjectionRule {
            keywords: &["price", "low offer", "worth more"],
            response: "I understand price is important, {name}. Our offers are based on comparable land sales and what the parcel can actually support. Happy to walk you through the factors we consider - no obligation either way.",
        },
        ObjectionRule {
            keywords: &["develop", "building", "plans"],
            response: "I understand you had development plans, {name}. Sometimes selling now and investing elsewhere can be more profitable. Would you like to explore that on a quick call?",
        },
        ObjectionRule {
            keywords: &["family", "inherited", "keep it"],
            response: "I respect that it's family land, {name}. I work with many families and can make sure it goes to someone who will appreciate it. No pressure at all - just let me know if you'd like to talk it through.",
        },
    ],
    generic_objection: "That's a fair point, {name}. Would a quick call help? I can answer anything about the process and you can decide from there.",
    decline: "No problem at all, {name}, I appreciate the reply. If you ever reconsider selling your land in the future, feel free to reach out.",
    initial_outreach: "Hi {name}, this is {agent_name}. I'm buying vacant land and noticed you own a parcel near {address}. Would you consider a cash offer if it was simple and hassle-free? Reply STOP to opt out.",
    follow_ups: &[
        "Just checking in about your land near {address}, {name}. Any updates on your plans? Reply STOP to opt out.",
        "Hi {name}, following up about your vacant land. Let me know if you'd like to discuss selling. Reply STOP to opt out.",
        "Hi {name}, I'll close my file for now unless you'd like to revisit selling the land near {address}. If circumstances change, feel free to reach out. Reply STOP to opt out.",
    ],
};

const RENTAL_SCRIPT: SpecialistScript = SpecialistScript {
    property_type: PropertyType::LongTermRental,
    required: fields::RENTAL_FIELDS,
    prompts: &[
        (
            FieldKey::RentalStatus,
            "Great! Is the property at {address} currently rented or vacant?",
        ),
        (
            FieldKey::Condition,
            "And how's the condition of the property? Has it been well-maintained or are there repairs needed?",
        ),
        (
            FieldKey::Timeline,
            "What's your ideal timeline for selling? Are you looking to sell right away, or would you prefer to wait until the lease expires?",
        ),
        (
            FieldKey::Access,
            "Understood. If we move forward, how would a walkthrough work with the current setup - coordinate with the tenants, or is there easier access?",
        ),
        (
            FieldKey::PriceExpectation,
            "Last one - do you have a rough number in mind for the property? Just helps me see if we're in the same range.",
        ),
    ],
    completion: "Thanks, {name}! We specialize in rental properties and can work around existing leases. The next step is a quick 15-minute call where I can review your rental situation and give you a cash range. What's easier for you - afternoon or evening this week?",
    objections: &[
        ObjectionRule {
            keywords: &["income", "cash flow", "good rent"],
            response: "I understand it's producing good income, {name}. I factor rental income into my offers and can often pay more than traditional buyers because I'm keeping it as a rental.",
        },
        ObjectionRule {
            keywords: &["tenant", "lease", "occupied"],
            response: "Tenant-occupied properties are actually my specialty, {name}. I can take over the existing lease and handle everything - the tenants don't need to go anywhere.",
        },
        ObjectionRule {
            keywords: &["price", "low offer", "worth more"],
            response: "Fair concern, {name}. My offers account for the rental income and the property's condition, and there's no obligation - I can give you a range and you decide if it works.",
        },
    ],
    generic_objection: "I hear you, {name}. Would a brief call help? I can walk through how we handle rentals and you can decide from there.",
    decline: "No problem at all, {name}! I appreciate you letting me know. If your situation with the rental changes, feel free to reach out anytime.",
    initial_outreach: "Hi {name}, I saw your property at {address} and wanted to reach out about a potential cash purchase. We buy rental properties as-is and can work with existing leases. Interested? Reply STOP to opt out.",
    follow_ups: &[
        "Hi {name}, following up about your rental property at {address}. Any changes in your situation? Reply STOP to opt out.",
        "Just checking in about your investment property, {name}. Let me know if you'd like to discuss selling options. Reply STOP to opt out.",
        "Hi {name}, last note from me about {address}. If you ever want a cash offer on the rental, I'm happy to help. Reply STOP to opt out.",
    ],
};

/// The script for a property type.
pub fn script_for(property_type: PropertyType) -> &'static SpecialistScript {
    match property_type {
        PropertyType::FixFlip => &FIX_FLIP_SCRIPT,
        PropertyType::VacantLand => &VACANT_LAND_SCRIPT,
        PropertyType::LongTermRental => &RENTAL_SCRIPT,
    }
}

/// Render a template's placeholders against lead identity values.
pub fn render(template: &str, name: &str, address: &str, agent_name: &str) -> String {
    template
        .replace("{name}", name)
        .replace("{address}", address)
        .replace("{agent_name}", agent_name)
}
