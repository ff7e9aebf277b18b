use crate::domain::entities::elemento::{Elemento, ElementoId};

/// Derived comparison row for one Elemento with a proposed value. Not
/// persisted; recomputed per rendering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactoElemento {
    pub id: ElementoId,
    pub nome: Option<String>,
    pub freq: Option<f64>,
    pub custo_unit: Option<f64>,
    pub custo_total: Option<f64>,
    pub valor_proposto: f64,
    pub total_proposto: f64,
    pub diferenca_total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumoImpacto {
    pub linhas: Vec<ImpactoElemento>,
    /// Absent (not zero) when no Elemento carries a proposed value.
    pub impacto_total: Option<f64>,
}

/// Filters the Elemento set to rows with a proposed value and derives the
/// cost comparison, preserving original relative order. The source slice
/// is never mutated.
///
/// Per row: `total_proposto = freq (default 1) × valor_proposto` and
/// `diferenca_total = total_proposto − custo_total (default 0)`.
pub fn calcular_impacto(elementos: &[Elemento]) -> ResumoImpacto {
    let linhas: Vec<ImpactoElemento> = elementos
        .iter()
        .filter_map(|el| {
            let valor_proposto = el.valor_proposto?;
            let freq = el.freq.unwrap_or(1.0);
            let custo_total = el.custo_total.unwrap_or(0.0);
            let total_proposto = freq * valor_proposto;
            Some(ImpactoElemento {
                id: el.id,
                nome: el.nome.clone(),
                freq: el.freq,
                custo_unit: el.custo_unit,
                custo_total: el.custo_total,
                valor_proposto,
                total_proposto,
                diferenca_total: total_proposto - custo_total,
            })
        })
        .collect();

    let impacto_total = if linhas.is_empty() {
        None
    } else {
        Some(linhas.iter().map(|linha| linha.diferenca_total).sum())
    };

    ResumoImpacto {
        linhas,
        impacto_total,
    }
}

/// Sign rule for the visual treatment: strictly greater than zero is the
/// only "positive" case; zero and negatives share the other treatment.
pub fn diferenca_positiva(valor: f64) -> bool {
    valor > 0.0
}
