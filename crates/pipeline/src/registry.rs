use anyhow::Result;
use models::{AliasRecord, ExporterInfo, ImporterInfo, Transaction};
use std::io::Read;

/// Closed set of known importers. Adding a bank format means adding one
/// variant here and one entry to `ALL`; calling code dispatches through
/// the capability methods and never names a dialect directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importer {
    C6Credit,
    NubankCredit,
    NubankDebit,
    SicrediCredit,
    SicrediDebit,
}

impl Importer {
    pub const ALL: [Importer; 5] = [
        Importer::C6Credit,
        Importer::NubankCredit,
        Importer::NubankDebit,
        Importer::SicrediCredit,
        Importer::SicrediDebit,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|i| i.info().name == name)
    }

    pub fn info(&self) -> ImporterInfo {
        match self {
            Importer::C6Credit => ImporterInfo {
                name: c6_credit::NAME,
                description: c6_credit::DESCRIPTION,
                extensions: c6_credit::EXTENSIONS,
            },
            Importer::NubankCredit => ImporterInfo {
                name: nubank_credit::NAME,
                description: nubank_credit::DESCRIPTION,
                extensions: nubank_credit::EXTENSIONS,
            },
            Importer::NubankDebit => ImporterInfo {
                name: nubank_debit::NAME,
                description: nubank_debit::DESCRIPTION,
                extensions: nubank_debit::EXTENSIONS,
            },
            Importer::SicrediCredit => ImporterInfo {
                name: sicredi_credit::NAME,
                description: sicredi_credit::DESCRIPTION,
                extensions: sicredi_credit::EXTENSIONS,
            },
            Importer::SicrediDebit => ImporterInfo {
                name: sicredi_debit::NAME,
                description: sicredi_debit::DESCRIPTION,
                extensions: sicredi_debit::EXTENSIONS,
            },
        }
    }

    pub fn parse<R: Read>(&self, reader: R) -> Result<Vec<Transaction>> {
        match self {
            Importer::C6Credit => c6_credit::C6CreditCsvParser::new().parse_reader(reader),
            Importer::NubankCredit => {
                nubank_credit::NubankCreditCsvParser::new().parse_reader(reader)
            }
            Importer::NubankDebit => nubank_debit::NubankDebitCsvParser::new().parse_reader(reader),
            Importer::SicrediCredit => {
                sicredi_credit::SicrediCreditCsvParser::new().parse_reader(reader)
            }
            Importer::SicrediDebit => sicredi_debit::SicrediOfxParser::new().parse_reader(reader),
        }
    }

    pub fn canonical_key(&self, description: &str) -> String {
        match self {
            Importer::C6Credit => c6_credit::canonical_key(description),
            Importer::NubankCredit => nubank_credit::canonical_key(description),
            Importer::NubankDebit => nubank_debit::canonical_key(description),
            Importer::SicrediCredit => sicredi_credit::canonical_key(description),
            Importer::SicrediDebit => sicredi_debit::canonical_key(description),
        }
    }

    pub fn resolve_alias(&self, description: &str, aliases: &[AliasRecord]) -> String {
        match self {
            Importer::C6Credit => c6_credit::resolve_alias(description, aliases),
            Importer::NubankCredit => nubank_credit::resolve_alias(description, aliases),
            Importer::NubankDebit => nubank_debit::resolve_alias(description, aliases),
            Importer::SicrediCredit => sicredi_credit::resolve_alias(description, aliases),
            Importer::SicrediDebit => sicredi_debit::resolve_alias(description, aliases),
        }
    }
}

/// Closed set of known exporters; same extension contract as `Importer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exporter {
    Mobills,
}

impl Exporter {
    pub const ALL: [Exporter; 1] = [Exporter::Mobills];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.info().name == name)
    }

    pub fn info(&self) -> ExporterInfo {
        match self {
            Exporter::Mobills => ExporterInfo {
                name: mobills::NAME,
                description: mobills::DESCRIPTION,
            },
        }
    }

    pub fn generate(&self, transactions: &[Transaction], account: Option<&str>) -> String {
        match self {
            Exporter::Mobills => mobills::generate(transactions, account),
        }
    }
}

pub fn list_importers() -> Vec<ImporterInfo> {
    Importer::ALL.iter().map(|i| i.info()).collect()
}

pub fn list_exporters() -> Vec<ExporterInfo> {
    Exporter::ALL.iter().map(|e| e.info()).collect()
}
