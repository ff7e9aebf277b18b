use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::domain::entities::elemento::AnaliseId;
use crate::infra::import::xlsx::ler_planilha;
use crate::usecase::ports::repo::AnaliseRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub analise_id: AnaliseId,
    pub row_count: i64,
}

pub struct ImportService {
    repo: Arc<dyn AnaliseRepository>,
}

impl ImportService {
    pub fn new(repo: Arc<dyn AnaliseRepository>) -> Self {
        Self { repo }
    }

    /// Ingests one spreadsheet: parses the first worksheet, registers an
    /// Analise keyed by the original filename and inserts the parsed
    /// Elementos under it. Only `.xlsx`/`.xls` are accepted; everything
    /// else is rejected before touching the file.
    pub fn importar(&self, path: &Path) -> Result<ImportResult> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();
        if ext != "xlsx" && ext != "xls" {
            return Err(anyhow!("formato não suportado: {ext:?} (somente .xlsx/.xls)"));
        }

        let elementos = ler_planilha(path)?;

        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("analise.xlsx");
        let analise = self
            .repo
            .criar_analise(filename)
            .map_err(|err| anyhow!(err.to_string()))?;
        let row_count = self
            .repo
            .inserir_elementos(analise.id, &elementos)
            .map_err(|err| anyhow!(err.to_string()))?;

        Ok(ImportResult {
            analise_id: analise.id,
            row_count,
        })
    }
}
