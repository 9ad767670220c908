//! Dataset Schema Module
//! Column-name and sheet-name constants; single source of truth for all tables.

/// Workbook (directory) names inside the dataset directory.
pub mod workbook {
    /// Raw bookkeeping workbook.
    pub const RAW: &str = "bv";
    /// Anonymized bookkeeping workbook, written by the encoder.
    pub const ENCODED: &str = "bv_encoded";
    /// Macroeconomic indicator workbook.
    pub const INDICES: &str = "indices";
    /// Name-to-code mapping workbook, written by the encoder.
    pub const NAME_CODES: &str = "name_codes";
}

/// Sheet names inside the workbooks.
pub mod sheet {
    pub const DRINKS: &str = "drinks";
    pub const TOP_BEER: &str = "top_beer";
    pub const TOP_SCHNAPPS: &str = "top_schnapps";
    pub const INDICATORS: &str = "indicators";
    pub const NAMES: &str = "names";
}

/// Drinks sheet: one row per (year, category).
pub mod drinks {
    pub const YEAR: &str = "year";
    pub const CATEGORY: &str = "category";
    pub const BOXES: &str = "boxes";

    pub const REQUIRED: [&str; 3] = [YEAR, CATEGORY, BOXES];

    /// Exact category label marking non-alcoholic drinks; every other
    /// category is a beer variant.
    pub const NON_ALCOHOLIC_LABEL: &str = "Spezi, Fanta usw.";
}

/// Top-10 beer drinkers sheet: per-year leaderboard, counts in glasses.
pub mod top_beer {
    pub const YEAR: &str = "year";
    pub const NAME: &str = "name";
    pub const BEER: &str = "beer";
    pub const NON_ALCOHOLIC: &str = "non_alcoholic";

    pub const REQUIRED: [&str; 4] = [YEAR, NAME, BEER, NON_ALCOHOLIC];
}

/// Top-10 schnapps drinkers sheet: per-year leaderboard, counts in shots.
pub mod top_schnapps {
    pub const YEAR: &str = "year";
    pub const NAME: &str = "name";
    pub const SCHNAPPS: &str = "schnapps";

    pub const REQUIRED: [&str; 3] = [YEAR, NAME, SCHNAPPS];
}

/// Indicator sheet: long source headers, renamed on load to short names.
pub mod indicators {
    pub const YEAR: &str = "year";
    pub const GDP_SOURCE: &str =
        "Bruttoinlandsprodukt (BIP) in Deutschland (in Milliarden Euro)";
    pub const CPI_SOURCE: &str = "Verbraucherpreisindex in Deutschland";
    pub const GDP: &str = "gdp";
    pub const CPI: &str = "cpi";

    pub const REQUIRED: [&str; 3] = [YEAR, GDP_SOURCE, CPI_SOURCE];
}

/// Yearly summary frame, one row per distinct year, ascending. Volumes in
/// liters.
pub mod summary {
    pub const YEAR: &str = "year";
    pub const BEER_TOTAL: &str = "beer_total";
    pub const NON_ALCOHOLIC_TOTAL: &str = "non_alcoholic_total";
    pub const BEER_TOP10: &str = "beer_top10";
    pub const NON_ALCOHOLIC_TOP10: &str = "non_alcoholic_top10";
    pub const SCHNAPPS_TOP10: &str = "schnapps_top10";

    /// All volume columns, in frame order.
    pub const VOLUME_COLUMNS: [&str; 5] = [
        BEER_TOTAL,
        NON_ALCOHOLIC_TOTAL,
        BEER_TOP10,
        NON_ALCOHOLIC_TOP10,
        SCHNAPPS_TOP10,
    ];
}

/// Name-code mapping sheet: index = code, value = name.
pub mod name_codes {
    pub const CODE: &str = "code";
    pub const NAME: &str = "name";
}

/// Unit conversions from bookkeeping units to liters.
pub mod units {
    /// One box holds 20 bottles of 0.5 l.
    pub const LITERS_PER_BOX: f64 = 20.0 * 0.5;
    /// One leaderboard beer or soft-drink entry is a 0.5 l glass.
    pub const LITERS_PER_GLASS: f64 = 0.5;
    /// One leaderboard schnapps entry is a 0.2 l shot.
    pub const LITERS_PER_SHOT: f64 = 0.2;
}
