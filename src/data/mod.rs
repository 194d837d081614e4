pub mod loader;
pub mod types;

pub use loader::{load_csv, LoaderError};
pub use types::{DailyRecord, MarketSeries, OptionType, PriceBar, SeriesError};
