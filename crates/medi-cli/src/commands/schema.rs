use medi_core::{Generation, PatientResultPayload, QueryResult};

use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::cli::{GlobalFlags, OutputFormat};

/// Handle `medi schema`. Always prints JSON; `raw` prints it on one line.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = schema_for(args.type_name);
    let rendered = if flags.format == OutputFormat::Raw {
        serde_json::to_string(&schema)?
    } else {
        serde_json::to_string_pretty(&schema)?
    };
    println!("{rendered}");
    Ok(())
}

fn schema_for(type_name: SchemaType) -> schemars::Schema {
    match type_name {
        SchemaType::QueryResult => schemars::schema_for!(QueryResult),
        SchemaType::Payload => schemars::schema_for!(PatientResultPayload),
        SchemaType::Generation => schemars::schema_for!(Generation),
    }
}
