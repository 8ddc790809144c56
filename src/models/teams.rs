/// ESPN numeric team id → NFL team abbreviation.
///
/// ESPN's core API identifies competitors by numeric team id; Sleeper's
/// player directory uses abbreviations. This table bridges the two.
/// Ids 33 and 34 are legacy aliases ESPN still emits for TB and KC.
const TEAM_ABBREVIATIONS: [(&str, &str); 34] = [
    ("1", "ATL"),
    ("2", "BUF"),
    ("3", "BAL"),
    ("4", "PHI"),
    ("5", "DET"),
    ("6", "CHI"),
    ("7", "NYG"),
    ("8", "CLE"),
    ("9", "MIA"),
    ("10", "SEA"),
    ("11", "WAS"),
    ("12", "NE"),
    ("13", "GB"),
    ("14", "TB"),
    ("15", "IND"),
    ("16", "TEN"),
    ("17", "NO"),
    ("18", "LAC"),
    ("19", "NYJ"),
    ("20", "DEN"),
    ("21", "MIN"),
    ("22", "KC"),
    ("23", "LAR"),
    ("24", "PIT"),
    ("25", "ARI"),
    ("26", "CIN"),
    ("27", "LV"),
    ("28", "SF"),
    ("29", "CAR"),
    ("30", "JAC"),
    ("31", "HOU"),
    ("32", "DAL"),
    ("33", "TB"),
    ("34", "KC"),
];

/// Looks up the NFL abbreviation for an ESPN team id.
///
/// An id absent from the table yields `None`; callers substitute an
/// empty abbreviation rather than failing, since a missing mapping is
/// a data-completeness gap and not an error.
pub fn espn_team_abbreviation(team_id: &str) -> Option<&'static str> {
    TEAM_ABBREVIATIONS
        .iter()
        .find(|(id, _)| *id == team_id)
        .map(|(_, abbr)| *abbr)
}
