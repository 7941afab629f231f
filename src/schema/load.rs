// src/schema/load.rs

use std::{fs, path::Path};
use tracing::{debug, info, instrument};

use super::types::ExportDefinition;
use crate::error::ConfigError;

/// Parse an export definition from YAML text.
pub fn parse_definition(path: &Path, contents: &str) -> Result<ExportDefinition, ConfigError> {
    serde_yaml::from_str(contents).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the export definition file at `path`.
#[instrument(level = "info")]
pub fn load_definition(path: &Path) -> Result<ExportDefinition, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::DefinitionMissing(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(bytes = contents.len(), "read export definition");

    let def = parse_definition(path, &contents)?;
    info!(
        master = def.master.len(),
        transaction = def.transaction.len(),
        "loaded export definition"
    );
    Ok(def)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DEFINITION: &str = r#"
master:
  - name: mst_ledger
    collection: Ledger
    fields:
      - name: guid
        field: Guid
        type: text
      - name: opening_balance
        field: OpeningBalance
        type: amount
      - name: is_revenue
        field: IsRevenue
        type: logical
transaction:
  - name: trn_accounting
    collection: Voucher.AllLedgerEntries
    fetch:
      - AllLedgerEntries
    filters:
      - NOT $IsCancelled
    fields:
      - name: guid
        field: ..Guid
        type: text
      - name: ledger
        field: LedgerName
      - name: weird
        field: Something
        type: currency
"#;

    #[test]
    fn parses_master_and_transaction_tables() -> Result<()> {
        let def = parse_definition(Path::new("inline.yaml"), DEFINITION)?;

        assert_eq!(def.master.len(), 1);
        assert_eq!(def.transaction.len(), 1);

        let ledger = &def.master[0];
        assert_eq!(ledger.collection, "Ledger");
        assert!(ledger.fetch.is_empty());
        assert!(ledger.filters.is_empty());
        assert_eq!(ledger.fields[1].ty, FieldType::Amount);

        let acc = &def.transaction[0];
        assert_eq!(acc.fetch, vec!["AllLedgerEntries"]);
        assert_eq!(acc.filters, vec!["NOT $IsCancelled"]);
        assert_eq!(acc.fields[0].field, "..Guid");
        // missing type defaults to raw, unknown names are kept distinguishable
        assert_eq!(acc.fields[1].ty, FieldType::Raw);
        assert_eq!(acc.fields[2].ty, FieldType::Unknown);
        Ok(())
    }

    #[test]
    fn missing_lists_are_empty() -> Result<()> {
        let def = parse_definition(
            Path::new("inline.yaml"),
            "master:\n  - name: a\n    collection: Group\n    fields: []\n",
        )?;
        assert_eq!(def.master.len(), 1);
        assert!(def.transaction.is_empty());
        Ok(())
    }

    #[test]
    fn load_from_disk() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(DEFINITION.as_bytes())?;

        let def = load_definition(tmp.path())?;
        let tables = def.select(true, true);
        let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["mst_ledger", "trn_accounting"]);

        let only_tx = def.select(false, true);
        assert_eq!(only_tx.len(), 1);
        assert_eq!(only_tx[0].name, "trn_accounting");
        Ok(())
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_definition(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::DefinitionMissing(_)));
    }

    #[test]
    fn bad_yaml_is_reported() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"master: [ { name: x")?;
        let err = load_definition(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
        Ok(())
    }
}
