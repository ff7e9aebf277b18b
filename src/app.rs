use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::prelude::*;
use rfd::FileDialog;

use crate::domain::entities::edit::{parse_staged, CellEditor, FieldKind, FieldValue};
use crate::domain::entities::elemento::{
    aplicar_atualizacao, AnaliseId, Elemento, ElementoId, Procedimento,
};
use crate::domain::impacto::{calcular_impacto, diferenca_positiva};
use crate::domain::session::{autenticar, gravar_sessao, limpar_sessao};
use crate::infra::sqlite::repo::SqliteRepo;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::format::{exibir_numero, exibir_opcional, formatar_data, formatar_moeda};
use crate::ui::state::app_state::{AppState, Pagina};
use crate::usecase::ports::repo::{AnaliseRepository, ElementoUpdate};
use crate::usecase::services::edit_service::EditService;
use crate::usecase::services::import_service::ImportService;
use crate::usecase::services::query_service::QueryService;
use crate::{default_data_dir, default_db_path};

/// Gold-label classification margin: the suggested value counts as "above"
/// only from 2% over the received unit cost.
pub const MARGEM_GOLD_LABEL: f64 = 1.02;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GruposGoldLabel {
    pub acima: Vec<Elemento>,
    pub abaixo_ou_igual: Vec<Elemento>,
    pub sem_gold_label: Vec<Elemento>,
}

/// Splits the Elementos of one Analise into the three review tables.
/// A zero suggested value counts as absent, matching how the records
/// arrive from ingestion.
pub fn agrupar_por_gold_label(elementos: &[Elemento]) -> GruposGoldLabel {
    let mut grupos = GruposGoldLabel::default();
    for elemento in elementos {
        let gold = elemento.gold_label_valor.filter(|valor| *valor != 0.0);
        let custo = elemento.custo_unit.filter(|valor| *valor != 0.0);
        match (gold, custo) {
            (None, _) => grupos.sem_gold_label.push(elemento.clone()),
            (Some(gold), Some(custo)) if gold >= custo * MARGEM_GOLD_LABEL => {
                grupos.acima.push(elemento.clone());
            }
            (Some(_), _) => grupos.abaixo_ou_igual.push(elemento.clone()),
        }
    }
    grupos
}

const ESTILO_TH: &str = "border: 1px solid #bbb; padding: 6px; background: #f2f2f2; text-align: left;";
const ESTILO_TD: &str = "border: 1px solid #bbb; padding: 6px;";
const ESTILO_TD_NUM: &str = "border: 1px solid #bbb; padding: 6px; text-align: right;";
const ESTILO_BOTAO: &str =
    "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;";
const ESTILO_CARTAO: &str =
    "background: #fff; border: 1px solid #ddd; border-radius: 8px; padding: 24px; box-shadow: 0 2px 8px rgba(0,0,0,0.08);";

type SalvarCampo = Rc<RefCell<dyn FnMut(ElementoId, ElementoUpdate)>>;

/// Inline editable cell. Click shows the edit buffer seeded from the
/// committed value, Enter commits, Escape cancels; the select kind commits
/// straight from the option change. The committed side only moves when the
/// owning view merged an acknowledged update back into the props.
#[component]
fn EditableCell(
    value: FieldValue,
    display: String,
    opcoes: Option<Vec<(i64, String)>>,
    mut status: Signal<String>,
    on_save: EventHandler<FieldValue>,
) -> Element {
    let mut editor = use_signal(|| CellEditor::new(value.clone()));

    let desatualizado = {
        let atual = editor.read();
        !atual.is_editing() && atual.committed() != &value
    };
    if desatualizado {
        editor.write().acknowledge(value.clone());
    }

    if value.kind() == FieldKind::Selecao {
        let opcoes = opcoes.unwrap_or_default();
        let selecionado = value.staged_text();
        return rsx! {
            select {
                style: "min-width: 160px; padding: 4px;",
                value: "{selecionado}",
                onchange: move |event| {
                    let resultado = {
                        let mut atual = editor.write();
                        atual.begin_edit();
                        atual.set_staged(event.value());
                        atual.commit()
                    };
                    match resultado {
                        Ok(valor) => on_save.call(valor),
                        Err(err) => status.set(format!("Erro: {err}")),
                    }
                },
                option { value: "", "Selecione..." }
                for (id, nome) in opcoes {
                    option { value: "{id}", "{nome}" }
                }
            }
        };
    }

    if editor.read().is_editing() {
        let staged = editor.read().staged().to_string();
        rsx! {
            input {
                style: "width: 110px; padding: 4px;",
                value: "{staged}",
                oninput: move |event| {
                    editor.write().set_staged(event.value());
                },
                onkeydown: move |event| {
                    if event.key() == Key::Enter {
                        let resultado = editor.write().commit();
                        match resultado {
                            Ok(valor) => on_save.call(valor),
                            Err(err) => status.set(format!("Erro: {err}")),
                        }
                    } else if event.key() == Key::Escape {
                        editor.write().cancel();
                    }
                },
                onblur: move |_| {
                    // A cancel (or an earlier commit) already left edit mode;
                    // the focus loss then sends nothing.
                    let esta_editando = editor.read().is_editing();
                    if !esta_editando {
                        return;
                    }
                    let resultado = editor.write().commit();
                    match resultado {
                        Ok(valor) => on_save.call(valor),
                        Err(err) => status.set(format!("Erro: {err}")),
                    }
                },
            }
        }
    } else {
        let ausente = value.is_absent();
        rsx! {
            div {
                style: if ausente {
                    "cursor: pointer; min-height: 1.4em; padding: 2px 4px; border-radius: 4px; color: #999; font-style: italic;"
                } else {
                    "cursor: pointer; min-height: 1.4em; padding: 2px 4px; border-radius: 4px;"
                },
                onclick: move |_| {
                    editor.write().begin_edit();
                },
                "{display}"
            }
        }
    }
}

/// Select labels carry the catalog's minimum value so the reviewer can pick
/// a reference without leaving the table.
fn rotulo_procedimento(procedimento: &Procedimento) -> String {
    match procedimento.valor_minimo {
        Some(valor) => format!(
            "{} ({})",
            procedimento.nome,
            formatar_moeda(Some(valor))
        ),
        None => procedimento.nome.clone(),
    }
}

fn tabela_elementos(
    titulo: &str,
    lista: Vec<Elemento>,
    procedimentos: Vec<Procedimento>,
    status: Signal<String>,
    salvar: SalvarCampo,
) -> Element {
    let opcoes: Vec<(i64, String)> = procedimentos
        .iter()
        .map(|proc| (proc.id.0, rotulo_procedimento(proc)))
        .collect();

    rsx! {
        div {
            style: "margin-bottom: 24px; background: #fff; border: 1px solid #ddd; border-radius: 8px; overflow: auto;",
            h3 { style: "padding: 12px 12px 0 12px; margin: 0 0 8px 0;", "{titulo}" }
            table { style: "border-collapse: collapse; width: 100%;",
                thead {
                    tr {
                        th { style: "{ESTILO_TH}", "Tipo" }
                        th { style: "{ESTILO_TH}", "Nome do procedimento" }
                        th { style: "{ESTILO_TH}", "Frequência" }
                        th { style: "{ESTILO_TH}", "Valor recebido" }
                        th { style: "{ESTILO_TH}", "Total recebido" }
                        th { style: "{ESTILO_TH}", "Custo unitário esperado" }
                        th { style: "{ESTILO_TH}", "Procedimento de referência" }
                        th { style: "{ESTILO_TH}", "Status" }
                        th { style: "{ESTILO_TH}", "Propor valor" }
                    }
                }
                tbody {
                    if lista.is_empty() {
                        tr {
                            td { style: "{ESTILO_TD}", colspan: "9", "Nenhum elemento encontrado" }
                        }
                    }
                    for elemento in lista {
                        tr {
                            key: "{elemento.id.0}",
                            title: "Criado em {formatar_data(&elemento.created_at)}",
                            td { style: "{ESTILO_TD}",
                                EditableCell {
                                    value: FieldValue::Texto(elemento.tipo.clone()),
                                    display: exibir_opcional(&elemento.tipo),
                                    status: status,
                                    on_save: {
                                        let salvar = salvar.clone();
                                        let id = elemento.id;
                                        move |valor: FieldValue| {
                                            if let FieldValue::Texto(texto) = valor {
                                                salvar.borrow_mut()(id, ElementoUpdate::Tipo(texto));
                                            }
                                        }
                                    },
                                }
                            }
                            td { style: "{ESTILO_TD}",
                                EditableCell {
                                    value: FieldValue::Texto(elemento.nome.clone()),
                                    display: exibir_opcional(&elemento.nome),
                                    status: status,
                                    on_save: {
                                        let salvar = salvar.clone();
                                        let id = elemento.id;
                                        move |valor: FieldValue| {
                                            if let FieldValue::Texto(texto) = valor {
                                                salvar.borrow_mut()(id, ElementoUpdate::Nome(texto));
                                            }
                                        }
                                    },
                                }
                            }
                            td { style: "{ESTILO_TD_NUM}",
                                EditableCell {
                                    value: FieldValue::Numero(elemento.freq),
                                    display: exibir_numero(&elemento.freq),
                                    status: status,
                                    on_save: {
                                        let salvar = salvar.clone();
                                        let id = elemento.id;
                                        move |valor: FieldValue| {
                                            if let FieldValue::Numero(numero) = valor {
                                                salvar.borrow_mut()(id, ElementoUpdate::Freq(numero));
                                            }
                                        }
                                    },
                                }
                            }
                            td { style: "{ESTILO_TD_NUM}",
                                EditableCell {
                                    value: FieldValue::Numero(elemento.custo_unit),
                                    display: exibir_numero(&elemento.custo_unit),
                                    status: status,
                                    on_save: {
                                        let salvar = salvar.clone();
                                        let id = elemento.id;
                                        move |valor: FieldValue| {
                                            if let FieldValue::Numero(numero) = valor {
                                                salvar.borrow_mut()(id, ElementoUpdate::CustoUnit(numero));
                                            }
                                        }
                                    },
                                }
                            }
                            td { style: "{ESTILO_TD_NUM}",
                                EditableCell {
                                    value: FieldValue::Numero(elemento.custo_total),
                                    display: exibir_numero(&elemento.custo_total),
                                    status: status,
                                    on_save: {
                                        let salvar = salvar.clone();
                                        let id = elemento.id;
                                        move |valor: FieldValue| {
                                            if let FieldValue::Numero(numero) = valor {
                                                salvar.borrow_mut()(id, ElementoUpdate::CustoTotal(numero));
                                            }
                                        }
                                    },
                                }
                            }
                            td { style: "{ESTILO_TD_NUM}", "{exibir_numero(&elemento.gold_label_valor)}" }
                            td { style: "{ESTILO_TD}",
                                EditableCell {
                                    value: FieldValue::Selecao(elemento.id_gold_label.map(|p| p.0)),
                                    display: exibir_opcional(&elemento.gold_label_nome),
                                    opcoes: opcoes.clone(),
                                    status: status,
                                    on_save: {
                                        let salvar = salvar.clone();
                                        let id = elemento.id;
                                        move |valor: FieldValue| {
                                            if let FieldValue::Selecao(escolhido) = valor {
                                                salvar.borrow_mut()(id, ElementoUpdate::GoldLabel(escolhido));
                                            }
                                        }
                                    },
                                }
                            }
                            td { style: "{ESTILO_TD}",
                                EditableCell {
                                    value: FieldValue::Texto(elemento.status.clone()),
                                    display: exibir_opcional(&elemento.status),
                                    status: status,
                                    on_save: {
                                        let salvar = salvar.clone();
                                        let id = elemento.id;
                                        move |valor: FieldValue| {
                                            if let FieldValue::Texto(texto) = valor {
                                                salvar.borrow_mut()(id, ElementoUpdate::Status(texto));
                                            }
                                        }
                                    },
                                }
                            }
                            td { style: "{ESTILO_TD}",
                                div { style: "display: flex; align-items: center; gap: 8px;",
                                    EditableCell {
                                        value: FieldValue::Numero(elemento.valor_proposto),
                                        display: exibir_numero(&elemento.valor_proposto),
                                        status: status,
                                        on_save: {
                                            let salvar = salvar.clone();
                                            let id = elemento.id;
                                            move |valor: FieldValue| {
                                                if let FieldValue::Numero(numero) = valor {
                                                    salvar.borrow_mut()(id, ElementoUpdate::ValorProposto(numero));
                                                }
                                            }
                                        },
                                    }
                                    if elemento.gold_label_valor.is_some() {
                                        button {
                                            style: "{ESTILO_BOTAO}",
                                            onclick: {
                                                let salvar = salvar.clone();
                                                let id = elemento.id;
                                                let sugerido = elemento.gold_label_valor;
                                                move |_| {
                                                    salvar.borrow_mut()(
                                                        id,
                                                        ElementoUpdate::ValorProposto(sugerido),
                                                    );
                                                }
                                            },
                                            "Aceitar"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let db_path = match default_db_path() {
        Ok(path) => path,
        Err(err) => {
            return rsx! {
                div {
                    p { "Não foi possível resolver o diretório de dados: {err}" }
                }
            };
        }
    };
    let data_dir = match default_data_dir() {
        Ok(dir) => dir,
        Err(err) => {
            return rsx! {
                div {
                    p { "Não foi possível resolver o diretório de dados: {err}" }
                }
            };
        }
    };
    let data_dir = Arc::new(data_dir);

    let sessao_inicial = crate::domain::session::carregar_sessao(&data_dir);
    let AppState {
        mut pagina,
        mut sessao,
        mut analises,
        mut elementos,
        mut procedimentos,
        mut arquivo_selecionado,
        mut busy,
        mut status,
        mut usuario_input,
        mut senha_input,
        mut proc_nome_input,
        mut proc_valor_input,
    } = AppState::new(sessao_inicial);

    let repo: Arc<dyn AnaliseRepository> = Arc::new(SqliteRepo { db_path });
    let query_service = Arc::new(QueryService::new(repo.clone()));
    let edit_service = Arc::new(EditService::new(repo.clone()));
    let import_service = Arc::new(ImportService::new(repo.clone()));

    let repo_for_init = repo.clone();
    use_effect(move || {
        if let Err(err) = run_blocking(|| repo_for_init.init()) {
            status.set(format!("Falha ao inicializar o banco local: {err}"));
        }
    });

    let carregar_historicos: Rc<RefCell<dyn FnMut()>> = Rc::new(RefCell::new({
        let query_service = query_service.clone();
        move || {
            *busy.write() = true;
            match run_blocking(|| query_service.listar_analises()) {
                Ok(lista) => {
                    analises.set(lista);
                }
                Err(err) => {
                    analises.set(Vec::new());
                    status.set(format!("Erro ao carregar histórico: {err}"));
                }
            }
            pagina.set(Pagina::Historicos);
            *busy.write() = false;
        }
    }));

    let abrir_detalhe: Rc<RefCell<dyn FnMut(AnaliseId)>> = Rc::new(RefCell::new({
        let query_service = query_service.clone();
        move |analise_id: AnaliseId| {
            *busy.write() = true;
            match run_blocking(|| query_service.listar_elementos(analise_id)) {
                Ok(lista) => elementos.set(lista),
                Err(err) => {
                    elementos.set(Vec::new());
                    status.set(format!("Erro ao carregar elementos: {err}"));
                }
            }
            match run_blocking(|| query_service.listar_procedimentos()) {
                Ok(lista) => procedimentos.set(lista),
                Err(err) => {
                    procedimentos.set(Vec::new());
                    status.set(format!("Erro ao carregar procedimentos: {err}"));
                }
            }
            pagina.set(Pagina::Detalhe(analise_id));
            *busy.write() = false;
        }
    }));

    let abrir_impacto: Rc<RefCell<dyn FnMut(AnaliseId)>> = Rc::new(RefCell::new({
        let query_service = query_service.clone();
        move |analise_id: AnaliseId| {
            *busy.write() = true;
            match run_blocking(|| query_service.listar_elementos(analise_id)) {
                Ok(lista) => elementos.set(lista),
                Err(err) => {
                    elementos.set(Vec::new());
                    status.set(format!(
                        "Erro ao carregar dados para cálculo de impacto: {err}"
                    ));
                }
            }
            pagina.set(Pagina::Impacto(analise_id));
            *busy.write() = false;
        }
    }));

    // One update request per committed cell; the in-memory collection only
    // changes after the store acknowledged the write.
    let salvar_campo: SalvarCampo = Rc::new(RefCell::new({
        let edit_service = edit_service.clone();
        move |id: ElementoId, update: ElementoUpdate| {
            let resultado = run_blocking(|| edit_service.atualizar_elemento(id, &update));
            match resultado {
                Ok(()) => {
                    aplicar_atualizacao(&mut elementos.write(), id, &update);
                    status.set("Atualizado com sucesso!".to_string());
                }
                Err(err) => {
                    status.set(format!("Erro ao salvar alteração: {err}"));
                }
            }
        }
    }));

    let cadastrar_procedimento: Rc<RefCell<dyn FnMut()>> = Rc::new(RefCell::new({
        let edit_service = edit_service.clone();
        let query_service = query_service.clone();
        move || {
            let nome = proc_nome_input().trim().to_string();
            if nome.is_empty() {
                status.set("Informe o nome do procedimento".to_string());
                return;
            }
            let valor_minimo = match parse_staged(FieldKind::Numero, &proc_valor_input()) {
                Ok(FieldValue::Numero(valor)) => valor,
                Ok(_) => None,
                Err(err) => {
                    status.set(format!("Erro: {err}"));
                    return;
                }
            };
            let resultado =
                run_blocking(|| edit_service.cadastrar_procedimento(&nome, valor_minimo));
            match resultado {
                Ok(_) => {
                    proc_nome_input.set(String::new());
                    proc_valor_input.set(String::new());
                    status.set(format!("Procedimento {nome:?} cadastrado"));
                    match run_blocking(|| query_service.listar_procedimentos()) {
                        Ok(lista) => procedimentos.set(lista),
                        Err(err) => {
                            status.set(format!("Erro ao recarregar procedimentos: {err}"));
                        }
                    }
                }
                Err(err) => {
                    status.set(format!("Erro ao cadastrar procedimento: {err}"));
                }
            }
        }
    }));

    let pagina_atual = if sessao().is_none() {
        Pagina::Login
    } else {
        pagina()
    };
    let esta_logado = sessao().is_some();
    let busy_snapshot = busy();

    let data_dir_for_logout = data_dir.clone();
    let data_dir_for_login = data_dir.clone();

    let conteudo = match pagina_atual {
        Pagina::Login => rsx! {
            div { style: "display: flex; justify-content: center; padding-top: 80px;",
                div { style: "{ESTILO_CARTAO} width: 360px;",
                    h2 { style: "text-align: center; margin-top: 0;", "Login" }
                    input {
                        style: "width: 100%; padding: 8px; margin-bottom: 12px; box-sizing: border-box;",
                        placeholder: "Usuário",
                        value: usuario_input(),
                        oninput: move |event| usuario_input.set(event.value()),
                    }
                    input {
                        style: "width: 100%; padding: 8px; margin-bottom: 12px; box-sizing: border-box;",
                        r#type: "password",
                        placeholder: "Senha",
                        value: senha_input(),
                        oninput: move |event| senha_input.set(event.value()),
                    }
                    button {
                        style: "{ESTILO_BOTAO} width: 100%;",
                        onclick: move |_| {
                            match autenticar(&usuario_input(), &senha_input()) {
                                Some(nova_sessao) => {
                                    if let Err(err) = gravar_sessao(&data_dir_for_login, &nova_sessao) {
                                        status.set(format!("Sessão não persistida: {err}"));
                                    }
                                    sessao.set(Some(nova_sessao));
                                    usuario_input.set(String::new());
                                    senha_input.set(String::new());
                                    pagina.set(Pagina::Inicio);
                                }
                                None => {
                                    status.set("Credenciais inválidas".to_string());
                                }
                            }
                        },
                        "Entrar"
                    }
                }
            }
        },
        Pagina::Inicio => {
            let carregar_for_inicio = carregar_historicos.clone();
            rsx! {
                div { style: "max-width: 720px; margin: 40px auto; text-align: center;",
                    h1 { "Sistema de Análise de Custos" }
                    p { style: "color: #666;",
                        "Envie arquivos .xlsx para processamento e gerencie suas análises"
                    }
                    div { style: "display: flex; gap: 16px; justify-content: center; margin-top: 32px;",
                        div { style: "{ESTILO_CARTAO} width: 280px;",
                            h2 { "Nova Análise" }
                            p { style: "color: #666;", "Envie um novo arquivo para processamento" }
                            button {
                                style: "{ESTILO_BOTAO} width: 100%;",
                                disabled: busy_snapshot,
                                onclick: move |_| {
                                    arquivo_selecionado.set(None);
                                    pagina.set(Pagina::Upload);
                                },
                                "Fazer Upload"
                            }
                        }
                        div { style: "{ESTILO_CARTAO} width: 280px;",
                            h2 { "Histórico" }
                            p { style: "color: #666;", "Visualize e edite análises já processadas" }
                            button {
                                style: "{ESTILO_BOTAO} width: 100%;",
                                disabled: busy_snapshot,
                                onclick: move |_| {
                                    carregar_for_inicio.borrow_mut()();
                                },
                                "Ver Histórico"
                            }
                        }
                    }
                }
            }
        }
        Pagina::Upload => {
            let carregar_for_upload = carregar_historicos.clone();
            let import_service_for_upload = import_service.clone();
            let arquivo = arquivo_selecionado();
            let tem_arquivo = arquivo.is_some();
            let rotulo_arquivo = arquivo
                .as_ref()
                .and_then(|path| path.file_name())
                .and_then(|name| name.to_str())
                .map(|name| name.to_string())
                .unwrap_or_else(|| "Selecione seu arquivo .xlsx".to_string());
            rsx! {
                div { style: "max-width: 560px; margin: 40px auto;",
                    button {
                        style: "{ESTILO_BOTAO} margin-bottom: 16px;",
                        onclick: move |_| pagina.set(Pagina::Inicio),
                        "← Voltar"
                    }
                    div { style: "{ESTILO_CARTAO}",
                        h2 { style: "margin-top: 0;", "Upload de Análise" }
                        p { style: "color: #666;", "Envie seu arquivo .xlsx para processamento" }
                        div { style: "border: 2px dashed #bbb; border-radius: 8px; padding: 32px; text-align: center; margin-bottom: 16px;",
                            if tem_arquivo {
                                p { style: "font-weight: 600;", "{rotulo_arquivo}" }
                            } else {
                                p { style: "color: #666;", "{rotulo_arquivo}" }
                            }
                            button {
                                style: "{ESTILO_BOTAO}",
                                disabled: busy_snapshot,
                                onclick: move |_| {
                                    let Some(path) = FileDialog::new()
                                        .add_filter("Planilhas", &["xlsx", "xls"])
                                        .pick_file()
                                    else {
                                        return;
                                    };
                                    let ext = path
                                        .extension()
                                        .and_then(|e| e.to_str())
                                        .map(|s| s.to_ascii_lowercase())
                                        .unwrap_or_default();
                                    if ext != "xlsx" && ext != "xls" {
                                        status.set(
                                            "Por favor, selecione um arquivo .xlsx ou .xls"
                                                .to_string(),
                                        );
                                        return;
                                    }
                                    arquivo_selecionado.set(Some(path));
                                },
                                "Selecionar arquivo"
                            }
                        }
                        button {
                            style: "{ESTILO_BOTAO} width: 100%;",
                            disabled: busy_snapshot || !tem_arquivo,
                            onclick: move |_| {
                                let Some(path) = arquivo_selecionado() else {
                                    status.set("Por favor, selecione um arquivo".to_string());
                                    return;
                                };
                                *busy.write() = true;
                                status.set(format!("Enviando {}", path.display()));
                                let resultado =
                                    run_blocking(|| import_service_for_upload.importar(&path));
                                match resultado {
                                    Ok(importado) => {
                                        status.set(format!(
                                            "Arquivo enviado com sucesso! Análise #{} com {} itens",
                                            importado.analise_id.0, importado.row_count
                                        ));
                                        arquivo_selecionado.set(None);
                                        carregar_for_upload.borrow_mut()();
                                    }
                                    Err(err) => {
                                        status.set(format!("Erro ao processar arquivo: {err}"));
                                    }
                                }
                                *busy.write() = false;
                            },
                            "Enviar Arquivo"
                        }
                    }
                }
            }
        }
        Pagina::Historicos => {
            let abrir_detalhe_for_lista = abrir_detalhe.clone();
            let abrir_impacto_for_lista = abrir_impacto.clone();
            let lista = analises();
            rsx! {
                div { style: "max-width: 960px; margin: 24px auto;",
                    div { style: "display: flex; justify-content: space-between; align-items: center; margin-bottom: 16px;",
                        div {
                            button {
                                style: "{ESTILO_BOTAO}",
                                onclick: move |_| pagina.set(Pagina::Inicio),
                                "← Voltar"
                            }
                            span { style: "margin-left: 12px; font-size: 1.4em; font-weight: 600;",
                                "Histórico de Análises"
                            }
                        }
                        button {
                            style: "{ESTILO_BOTAO}",
                            disabled: busy_snapshot,
                            onclick: move |_| {
                                arquivo_selecionado.set(None);
                                pagina.set(Pagina::Upload);
                            },
                            "Nova Análise"
                        }
                    }
                    div { style: "background: #fff; border: 1px solid #ddd; border-radius: 8px; overflow: hidden;",
                        table { style: "border-collapse: collapse; width: 100%;",
                            thead {
                                tr {
                                    th { style: "{ESTILO_TH}", "ID" }
                                    th { style: "{ESTILO_TH}", "Arquivo" }
                                    th { style: "{ESTILO_TH}", "Data de Criação" }
                                    th { style: "{ESTILO_TH}", "Ações" }
                                }
                            }
                            tbody {
                                if lista.is_empty() {
                                    tr {
                                        td { style: "{ESTILO_TD}", colspan: "4",
                                            "Nenhuma análise encontrada"
                                        }
                                    }
                                }
                                for analise in lista {
                                    tr { key: "{analise.id.0}",
                                        td { style: "{ESTILO_TD}", "{analise.id.0}" }
                                        td { style: "{ESTILO_TD}", "{analise.filename}" }
                                        td { style: "{ESTILO_TD}", "{formatar_data(&analise.created_at)}" }
                                        td { style: "{ESTILO_TD}",
                                            button {
                                                style: "{ESTILO_BOTAO} margin-right: 8px;",
                                                disabled: busy_snapshot,
                                                onclick: {
                                                    let abrir = abrir_detalhe_for_lista.clone();
                                                    let id = analise.id;
                                                    move |_| abrir.borrow_mut()(id)
                                                },
                                                "Ver Detalhes"
                                            }
                                            button {
                                                style: "{ESTILO_BOTAO}",
                                                disabled: busy_snapshot,
                                                onclick: {
                                                    let abrir = abrir_impacto_for_lista.clone();
                                                    let id = analise.id;
                                                    move |_| abrir.borrow_mut()(id)
                                                },
                                                "Calcular Impacto"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        Pagina::Detalhe(analise_id) => {
            let carregar_for_detalhe = carregar_historicos.clone();
            let cadastrar_for_detalhe = cadastrar_procedimento.clone();
            let grupos = agrupar_por_gold_label(&elementos());
            let procedimentos_snapshot = procedimentos();
            rsx! {
                div { style: "max-width: 1200px; margin: 24px auto;",
                    div { style: "margin-bottom: 16px;",
                        button {
                            style: "{ESTILO_BOTAO}",
                            onclick: move |_| carregar_for_detalhe.borrow_mut()(),
                            "← Voltar"
                        }
                        span { style: "margin-left: 12px; font-size: 1.4em; font-weight: 600;",
                            "Detalhes da Análise #{analise_id.0}"
                        }
                        p { style: "color: #666; margin: 4px 0 0 0;",
                            "Clique nas células para editar os valores"
                        }
                    }
                    div { style: "display: flex; gap: 8px; align-items: center; margin-bottom: 16px;",
                        input {
                            style: "padding: 6px; flex: 1;",
                            placeholder: "Novo procedimento de referência",
                            value: proc_nome_input(),
                            oninput: move |event| proc_nome_input.set(event.value()),
                        }
                        input {
                            style: "padding: 6px; width: 140px;",
                            placeholder: "Valor mínimo",
                            value: proc_valor_input(),
                            oninput: move |event| proc_valor_input.set(event.value()),
                        }
                        button {
                            style: "{ESTILO_BOTAO}",
                            disabled: busy_snapshot,
                            onclick: move |_| cadastrar_for_detalhe.borrow_mut()(),
                            "Cadastrar"
                        }
                    }
                    {tabela_elementos(
                        "Procedimentos com Gold Label 2% Acima",
                        grupos.acima,
                        procedimentos_snapshot.clone(),
                        status,
                        salvar_campo.clone(),
                    )}
                    {tabela_elementos(
                        "Procedimentos com Gold Label Abaixo ou Igual",
                        grupos.abaixo_ou_igual,
                        procedimentos_snapshot.clone(),
                        status,
                        salvar_campo.clone(),
                    )}
                    {tabela_elementos(
                        "Procedimentos Sem Gold Label",
                        grupos.sem_gold_label,
                        procedimentos_snapshot,
                        status,
                        salvar_campo.clone(),
                    )}
                }
            }
        }
        Pagina::Impacto(analise_id) => {
            let carregar_for_impacto = carregar_historicos.clone();
            let resumo = calcular_impacto(&elementos());
            let cor_total = if resumo.impacto_total.map(diferenca_positiva).unwrap_or(false) {
                "color: #2a9d3a;"
            } else {
                "color: #d23a3a;"
            };
            rsx! {
                div { style: "max-width: 1100px; margin: 24px auto;",
                    div { style: "margin-bottom: 16px;",
                        button {
                            style: "{ESTILO_BOTAO}",
                            onclick: move |_| carregar_for_impacto.borrow_mut()(),
                            "← Voltar"
                        }
                        span { style: "margin-left: 12px; font-size: 1.4em; font-weight: 600;",
                            "Calcular Impacto das Propostas"
                        }
                        p { style: "color: #666; margin: 4px 0 0 0;",
                            "Análise comparativa de valores propostos vs. recebidos para a análise #{analise_id.0}"
                        }
                    }
                    div { style: "background: #fff; border: 1px solid #ddd; border-radius: 8px; overflow: hidden;",
                        table { style: "border-collapse: collapse; width: 100%;",
                            thead {
                                tr {
                                    th { style: "{ESTILO_TH}", "Item" }
                                    th { style: "{ESTILO_TH}", "Valor Recebido" }
                                    th { style: "{ESTILO_TH}", "Frequência" }
                                    th { style: "{ESTILO_TH}", "Total Recebido" }
                                    th { style: "{ESTILO_TH}", "Valor Proposto" }
                                    th { style: "{ESTILO_TH}", "Total Proposto" }
                                    th { style: "{ESTILO_TH}", "Diferença Total" }
                                }
                            }
                            tbody {
                                if resumo.linhas.is_empty() {
                                    tr {
                                        td { style: "{ESTILO_TD}", colspan: "7",
                                            "Nenhum item com valor proposto encontrado para esta análise."
                                        }
                                    }
                                }
                                for linha in resumo.linhas {
                                    tr { key: "{linha.id.0}",
                                        td { style: "{ESTILO_TD}", "{exibir_opcional(&linha.nome)}" }
                                        td { style: "{ESTILO_TD_NUM}", "{formatar_moeda(linha.custo_unit)}" }
                                        td { style: "{ESTILO_TD_NUM}", "{exibir_numero(&linha.freq)}" }
                                        td { style: "{ESTILO_TD_NUM}", "{formatar_moeda(linha.custo_total)}" }
                                        td { style: "{ESTILO_TD_NUM}", "{formatar_moeda(Some(linha.valor_proposto))}" }
                                        td { style: "{ESTILO_TD_NUM}", "{formatar_moeda(Some(linha.total_proposto))}" }
                                        td {
                                            style: if diferenca_positiva(linha.diferenca_total) {
                                                "border: 1px solid #bbb; padding: 6px; text-align: right; font-weight: 700; color: #2a9d3a;"
                                            } else {
                                                "border: 1px solid #bbb; padding: 6px; text-align: right; font-weight: 700; color: #d23a3a;"
                                            },
                                            "{formatar_moeda(Some(linha.diferenca_total))}"
                                        }
                                    }
                                }
                            }
                            tfoot {
                                tr {
                                    td { style: "{ESTILO_TD_NUM} font-weight: 700;", colspan: "6",
                                        "Impacto Total"
                                    }
                                    td { style: "border: 1px solid #bbb; padding: 6px; text-align: right; font-weight: 700; {cor_total}",
                                        "{formatar_moeda(resumo.impacto_total)}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 12px; background: #f7f7f8; min-height: 100vh;",
            div { style: "display: flex; justify-content: space-between; align-items: center; padding: 4px 8px;",
                span { style: "font-weight: 700;", "NegociaAI" }
                div { style: "display: flex; align-items: center; gap: 12px;",
                    span { style: "color: #666;", " {status}" }
                    if esta_logado {
                        button {
                            style: "{ESTILO_BOTAO}",
                            onclick: move |_| {
                                if let Err(err) = limpar_sessao(&data_dir_for_logout) {
                                    status.set(format!("Falha ao encerrar sessão: {err}"));
                                }
                                sessao.set(None);
                                pagina.set(Pagina::Login);
                            },
                            "Sair"
                        }
                    }
                }
            }
            {conteudo}
        }
    }
}
