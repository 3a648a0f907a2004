pub mod catalog;
pub mod config;
pub mod encoder;
pub mod extractor;
pub mod pipeline;
pub mod plan;
pub mod progress;
pub mod testing;
pub mod workspace;

pub use catalog::{
    parse_selection, CatalogError, MakeMkvCatalog, Selection, SelectionError, SourceUnit, Title,
    TitleCatalog, TitleId,
};
pub use config::{
    find_config, load_config, load_config_from_str, save_config, validate_config, Config,
    ConfigError,
};
pub use encoder::{EncodeSettings, Encoder, EncoderError, HandBrakeEncoder};
pub use extractor::{Extractor, ExtractorError, MakeMkvExtractor};
pub use pipeline::{PipelineConfig, PipelineError, PipelineRunner, RunSummary};
pub use plan::{encoded_file_name, find_output_collision, plan_titles, PlannedTitle};
pub use progress::{Phase, PhaseStatus, ProgressDisplay, ProgressTracker};
pub use workspace::RunDirectories;
