use std::sync::Arc;

use crate::domain::entities::elemento::{ElementoId, ProcedimentoId};
use crate::usecase::ports::repo::{AnaliseRepository, ElementoUpdate, RepoError};

pub struct EditService {
    repo: Arc<dyn AnaliseRepository>,
}

impl EditService {
    pub fn new(repo: Arc<dyn AnaliseRepository>) -> Self {
        Self { repo }
    }

    /// One collaborator request per committed cell. No retry: a failure is
    /// reported once and the caller keeps its pre-edit value.
    pub fn atualizar_elemento(
        &self,
        id: ElementoId,
        update: &ElementoUpdate,
    ) -> Result<(), RepoError> {
        self.repo.atualizar_elemento(id, update)
    }

    pub fn cadastrar_procedimento(
        &self,
        nome: &str,
        valor_minimo: Option<f64>,
    ) -> Result<ProcedimentoId, RepoError> {
        self.repo.cadastrar_procedimento(nome, valor_minimo)
    }
}
