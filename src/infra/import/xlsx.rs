use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use crate::usecase::ports::repo::NovoElemento;

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

fn texto_opcional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Spreadsheet exports mix "R$ 1.234,56" and plain "1234.56". A comma marks
// the pt-BR form, where '.' is a thousands separator.
fn numero_opcional(value: &str) -> Option<f64> {
    let limpo = value.trim().trim_start_matches("R$");
    let limpo = limpo.trim();
    if limpo.contains(',') {
        limpo.replace('.', "").replace(',', ".").parse::<f64>().ok()
    } else {
        limpo.parse::<f64>().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coluna {
    Tipo,
    Nome,
    Freq,
    CustoUnit,
    CustoTotal,
    Status,
}

fn reconhecer_coluna(header: &str) -> Option<Coluna> {
    let nome = header.trim().to_lowercase();
    if nome.is_empty() {
        return None;
    }
    if nome.contains("tipo") {
        Some(Coluna::Tipo)
    } else if nome.contains("freq") {
        Some(Coluna::Freq)
    } else if nome.contains("unit") || nome.contains("unitário") || nome.contains("unitario") {
        Some(Coluna::CustoUnit)
    } else if nome.contains("total") {
        Some(Coluna::CustoTotal)
    } else if nome.contains("status") || nome.contains("situação") || nome.contains("situacao") {
        Some(Coluna::Status)
    } else if nome.contains("nome") || nome.contains("procedimento") || nome.contains("item") {
        Some(Coluna::Nome)
    } else {
        None
    }
}

/// Maps a worksheet (header row + data rows, already stringified) into
/// NovoElemento rows. Columns are matched by header name; unrecognized
/// columns are ignored, rows with no recognizable content are skipped.
pub fn mapear_linhas(headers: &[String], rows: &[Vec<String>]) -> Vec<NovoElemento> {
    let colunas: Vec<Option<Coluna>> = headers
        .iter()
        .map(|header| reconhecer_coluna(header))
        .collect();

    let mut elementos = Vec::new();
    for row in rows {
        let mut elemento = NovoElemento::default();
        let mut preenchido = false;
        for (idx, coluna) in colunas.iter().enumerate() {
            let Some(coluna) = coluna else { continue };
            let valor = row.get(idx).map(String::as_str).unwrap_or("");
            if valor.trim().is_empty() {
                continue;
            }
            preenchido = true;
            match coluna {
                Coluna::Tipo => elemento.tipo = texto_opcional(valor),
                Coluna::Nome => elemento.nome = texto_opcional(valor),
                Coluna::Freq => elemento.freq = numero_opcional(valor),
                Coluna::CustoUnit => elemento.custo_unit = numero_opcional(valor),
                Coluna::CustoTotal => elemento.custo_total = numero_opcional(valor),
                Coluna::Status => elemento.status = texto_opcional(valor),
            }
        }
        if preenchido {
            elementos.push(elemento);
        }
    }
    elementos
}

/// Reads the first worksheet of an `.xlsx`/`.xls` file into NovoElemento
/// rows. The first row is the header.
pub fn ler_planilha(path: &Path) -> Result<Vec<NovoElemento>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook: {}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("workbook has no worksheets")?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet: {sheet_name}"))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .context("worksheet is empty")?
        .iter()
        .map(cell_to_string)
        .collect();
    let data: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(mapear_linhas(&headers, &data))
}
