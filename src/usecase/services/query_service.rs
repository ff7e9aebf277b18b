use std::sync::Arc;

use crate::domain::entities::elemento::{Analise, AnaliseId, Elemento, Procedimento};
use crate::usecase::ports::repo::{AnaliseRepository, RepoError};

pub struct QueryService {
    repo: Arc<dyn AnaliseRepository>,
}

impl QueryService {
    pub fn new(repo: Arc<dyn AnaliseRepository>) -> Self {
        Self { repo }
    }

    pub fn listar_analises(&self) -> Result<Vec<Analise>, RepoError> {
        self.repo.listar_analises()
    }

    pub fn listar_elementos(&self, analise_id: AnaliseId) -> Result<Vec<Elemento>, RepoError> {
        self.repo.listar_elementos(analise_id)
    }

    pub fn listar_procedimentos(&self) -> Result<Vec<Procedimento>, RepoError> {
        self.repo.listar_procedimentos()
    }
}
