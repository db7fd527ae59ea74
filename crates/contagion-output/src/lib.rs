#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/contagion/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod summary;

pub use export::{
    AverageCentralities, AverageNetwork, ExportError, ExportFormat, Exporter, IndicatorRecord,
    IndicatorSeries, MeasureSeries, write_dataset,
};
pub use summary::{FirmCentrality, IndicatorStats, NetworkSummary};
