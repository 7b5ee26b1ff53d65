//! Owning teams offered by the general form's team picker

pub const OWNING_TEAMS: &[&str] = &[
    "Platform",
    "Data Infrastructure",
    "Observability",
    "Messaging",
    "Storage",
    "Identity",
    "Payments",
    "Developer Experience",
];

pub fn owning_teams() -> Vec<&'static str> {
    OWNING_TEAMS.to_vec()
}
