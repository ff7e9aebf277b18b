use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::elemento::{Analise, AnaliseId, Elemento, Procedimento};
use crate::domain::session::Sessao;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pagina {
    Login,
    Inicio,
    Upload,
    Historicos,
    Detalhe(AnaliseId),
    Impacto(AnaliseId),
}

pub struct AppState {
    pub pagina: Signal<Pagina>,
    pub sessao: Signal<Option<Sessao>>,
    pub analises: Signal<Vec<Analise>>,
    pub elementos: Signal<Vec<Elemento>>,
    pub procedimentos: Signal<Vec<Procedimento>>,
    pub arquivo_selecionado: Signal<Option<std::path::PathBuf>>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
    pub usuario_input: Signal<String>,
    pub senha_input: Signal<String>,
    pub proc_nome_input: Signal<String>,
    pub proc_valor_input: Signal<String>,
}

impl AppState {
    pub fn new(sessao_inicial: Option<Sessao>) -> Self {
        let pagina_inicial = if sessao_inicial.is_some() {
            Pagina::Inicio
        } else {
            Pagina::Login
        };
        Self {
            pagina: use_signal(|| pagina_inicial),
            sessao: use_signal(|| sessao_inicial),
            analises: use_signal(Vec::<Analise>::new),
            elementos: use_signal(Vec::<Elemento>::new),
            procedimentos: use_signal(Vec::<Procedimento>::new),
            arquivo_selecionado: use_signal(|| None::<std::path::PathBuf>),
            busy: use_signal(|| false),
            status: use_signal(String::new),
            usuario_input: use_signal(String::new),
            senha_input: use_signal(String::new),
            proc_nome_input: use_signal(String::new),
            proc_valor_input: use_signal(String::new),
        }
    }
}
