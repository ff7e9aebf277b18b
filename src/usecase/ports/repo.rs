use crate::domain::entities::elemento::{
    Analise, AnaliseId, Elemento, ElementoId, Procedimento, ProcedimentoId,
};

/// Collaborator failures, split by read vs. write so the views can apply
/// the right policy: a fetch failure clears the view, an update failure
/// leaves the pre-edit value in place. Neither is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Fetch(String),
    Update(String),
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::Fetch(message) => write!(f, "falha ao carregar: {message}"),
            RepoError::Update(message) => write!(f, "falha ao salvar: {message}"),
        }
    }
}

impl std::error::Error for RepoError {}

/// One update operation per editable attribute. Keeping this a closed
/// union makes the update contract statically enumerable instead of an
/// open string-keyed field map.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementoUpdate {
    Tipo(Option<String>),
    Nome(Option<String>),
    Freq(Option<f64>),
    CustoUnit(Option<f64>),
    CustoTotal(Option<f64>),
    Status(Option<String>),
    ValorProposto(Option<f64>),
    GoldLabel(Option<i64>),
}

/// Row shape handed to the repository by the ingestion path. Ids and
/// timestamps are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NovoElemento {
    pub tipo: Option<String>,
    pub nome: Option<String>,
    pub freq: Option<f64>,
    pub custo_unit: Option<f64>,
    pub custo_total: Option<f64>,
    pub status: Option<String>,
}

pub trait AnaliseRepository: Send + Sync {
    fn init(&self) -> Result<(), RepoError>;

    /// Newest first.
    fn listar_analises(&self) -> Result<Vec<Analise>, RepoError>;
    fn criar_analise(&self, filename: &str) -> Result<Analise, RepoError>;

    /// Original insertion order, gold-label fields denormalized from the
    /// referenced Procedimento.
    fn listar_elementos(&self, analise_id: AnaliseId) -> Result<Vec<Elemento>, RepoError>;
    fn inserir_elementos(
        &self,
        analise_id: AnaliseId,
        elementos: &[NovoElemento],
    ) -> Result<i64, RepoError>;

    /// Partial update of exactly one field; safe to call with any single
    /// variant. Last write wins across sessions.
    fn atualizar_elemento(&self, id: ElementoId, update: &ElementoUpdate)
        -> Result<(), RepoError>;

    /// Ordered by nome ascending.
    fn listar_procedimentos(&self) -> Result<Vec<Procedimento>, RepoError>;
    fn cadastrar_procedimento(
        &self,
        nome: &str,
        valor_minimo: Option<f64>,
    ) -> Result<ProcedimentoId, RepoError>;
}
