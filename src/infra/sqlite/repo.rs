use std::path::PathBuf;

use crate::domain::entities::elemento::{
    Analise, AnaliseId, Elemento, ElementoId, Procedimento, ProcedimentoId,
};
use crate::infra::sqlite::queries::{
    atualizar_elemento, cadastrar_procedimento, criar_analise, inserir_elementos, listar_analises,
    listar_elementos, listar_procedimentos,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{AnaliseRepository, ElementoUpdate, NovoElemento, RepoError};

/// The local collaborator: record storage behind the repository port.
/// Reads surface as `Fetch`, writes as `Update`, at this boundary.
pub struct SqliteRepo {
    pub db_path: PathBuf,
}

impl AnaliseRepository for SqliteRepo {
    fn init(&self) -> Result<(), RepoError> {
        init_db(&self.db_path).map_err(|err| RepoError::Fetch(err.to_string()))
    }

    fn listar_analises(&self) -> Result<Vec<Analise>, RepoError> {
        listar_analises(&self.db_path).map_err(|err| RepoError::Fetch(err.to_string()))
    }

    fn criar_analise(&self, filename: &str) -> Result<Analise, RepoError> {
        criar_analise(&self.db_path, filename).map_err(|err| RepoError::Update(err.to_string()))
    }

    fn listar_elementos(&self, analise_id: AnaliseId) -> Result<Vec<Elemento>, RepoError> {
        listar_elementos(&self.db_path, analise_id.0)
            .map_err(|err| RepoError::Fetch(err.to_string()))
    }

    fn inserir_elementos(
        &self,
        analise_id: AnaliseId,
        elementos: &[NovoElemento],
    ) -> Result<i64, RepoError> {
        inserir_elementos(&self.db_path, analise_id.0, elementos)
            .map_err(|err| RepoError::Update(err.to_string()))
    }

    fn atualizar_elemento(
        &self,
        id: ElementoId,
        update: &ElementoUpdate,
    ) -> Result<(), RepoError> {
        atualizar_elemento(&self.db_path, id.0, update)
            .map_err(|err| RepoError::Update(err.to_string()))
    }

    fn listar_procedimentos(&self) -> Result<Vec<Procedimento>, RepoError> {
        listar_procedimentos(&self.db_path).map_err(|err| RepoError::Fetch(err.to_string()))
    }

    fn cadastrar_procedimento(
        &self,
        nome: &str,
        valor_minimo: Option<f64>,
    ) -> Result<ProcedimentoId, RepoError> {
        cadastrar_procedimento(&self.db_path, nome, valor_minimo)
            .map(ProcedimentoId)
            .map_err(|err| RepoError::Update(err.to_string()))
    }
}
