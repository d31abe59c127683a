//! Resolve command implementation.

use crate::input;
use clap::Subcommand;
use epcis_core::{
    resolve_cbv, resolve_epc, CbvFormat, EpcFormat, IdentifierValue, ResolveContext,
    VocabularyCategory, VocabularyTerm,
};

#[derive(Subcommand)]
pub enum Target {
    /// Render an EPC (URN or GS1 Digital Link)
    Epc {
        /// Identifier literal
        literal: String,
        /// GS1-EPC-Format header value
        #[arg(long, default_value = "Always_GS1_Digital_Link")]
        format: String,
        /// Treat the literal as a class-level identifier
        #[arg(long)]
        class: bool,
        /// GS1 company prefix settings file
        #[arg(long)]
        gs1_settings: Option<String>,
    },
    /// Render a CBV vocabulary term
    Cbv {
        /// Vocabulary field (bizStep, disposition, errorReason, ...)
        category: String,
        /// Term literal
        literal: String,
        /// GS1-CBV-XML-Format header value
        #[arg(long, default_value = "No_Preference")]
        format: String,
        /// JSON-LD context file
        #[arg(long)]
        context: Option<String>,
    },
}

pub fn run(target: Target) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = match target {
        Target::Epc {
            literal,
            format,
            class,
            gs1_settings,
        } => {
            let format: EpcFormat = format.parse()?;
            let context = ResolveContext::default()
                .with_settings(input::load_settings(gs1_settings.as_deref())?);
            let value = if class {
                IdentifierValue::class(literal)
            } else {
                IdentifierValue::instance(literal)
            };
            resolve_epc(&value, format, &context)?
        }
        Target::Cbv {
            category,
            literal,
            format,
            context,
        } => {
            let category: VocabularyCategory = category.parse()?;
            let format: CbvFormat = format.parse()?;
            let context = match context {
                Some(path) => ResolveContext::from_entries(&input::load_context(&path)?),
                None => ResolveContext::default(),
            };
            resolve_cbv(&VocabularyTerm::new(literal, category), format, &context)?
        }
    };
    println!("{}", rendered);
    Ok(())
}
