use crate::usecase::ports::repo::ElementoUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnaliseId(pub i64);

impl From<i64> for AnaliseId {
    fn from(value: i64) -> Self {
        AnaliseId(value)
    }
}

impl From<AnaliseId> for i64 {
    fn from(value: AnaliseId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementoId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcedimentoId(pub i64);

/// One line item of an uploaded analysis. Created by ingestion, mutated
/// field-by-field through the editable cells, never deleted here.
#[derive(Debug, Clone, PartialEq)]
pub struct Elemento {
    pub id: ElementoId,
    pub analise_id: AnaliseId,
    pub created_at: String,
    pub tipo: Option<String>,
    pub nome: Option<String>,
    pub freq: Option<f64>,
    pub custo_unit: Option<f64>,
    pub custo_total: Option<f64>,
    pub status: Option<String>,
    pub valor_proposto: Option<f64>,
    pub id_gold_label: Option<ProcedimentoId>,
    /// Denormalized from the referenced Procedimento, read-only.
    pub gold_label_nome: Option<String>,
    pub gold_label_valor: Option<f64>,
}

/// Reference catalog entry. Immutable from this core's perspective.
#[derive(Debug, Clone, PartialEq)]
pub struct Procedimento {
    pub id: ProcedimentoId,
    pub nome: String,
    pub valor_minimo: Option<f64>,
}

/// A named batch of Elementos originating from one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analise {
    pub id: AnaliseId,
    pub filename: String,
    pub created_at: String,
}

/// Merges one committed field into the matching Elemento by id. Called by
/// the owning view only after the collaborator update was acknowledged;
/// the denormalized gold-label fields are refreshed by the caller's next
/// fetch, not here.
pub fn aplicar_atualizacao(
    elementos: &mut [Elemento],
    id: ElementoId,
    update: &ElementoUpdate,
) -> bool {
    let Some(elemento) = elementos.iter_mut().find(|el| el.id == id) else {
        return false;
    };
    match update {
        ElementoUpdate::Tipo(valor) => elemento.tipo = valor.clone(),
        ElementoUpdate::Nome(valor) => elemento.nome = valor.clone(),
        ElementoUpdate::Freq(valor) => elemento.freq = *valor,
        ElementoUpdate::CustoUnit(valor) => elemento.custo_unit = *valor,
        ElementoUpdate::CustoTotal(valor) => elemento.custo_total = *valor,
        ElementoUpdate::Status(valor) => elemento.status = valor.clone(),
        ElementoUpdate::ValorProposto(valor) => elemento.valor_proposto = *valor,
        ElementoUpdate::GoldLabel(valor) => {
            elemento.id_gold_label = valor.map(ProcedimentoId);
        }
    }
    true
}
