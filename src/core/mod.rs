pub mod spec;
pub mod step;
pub mod step_table;

pub use spec::{
    Axis, ChartSpec, Encoding, FieldDef, FieldType, FieldValue, InlineData, Layer, Mark,
    MarkKind, Row, Scale, Transform, VEGA_LITE_SCHEMA_V5,
};
pub use step::StepIndex;
pub use step_table::StepSpecTable;
