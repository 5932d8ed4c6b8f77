//! Configuration management for Tegn.

mod settings;

pub use settings::{
    FetcherSettings, GeneralSettings, GlossProvider, GlossSettings, SegmentationSettings,
    ServerSettings, Settings,
};
