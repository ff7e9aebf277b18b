use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;

use crate::app::{agrupar_por_gold_label, MARGEM_GOLD_LABEL};
use crate::domain::entities::edit::{parse_staged, CellEditor, FieldKind, FieldValue};
use crate::domain::entities::elemento::{
    aplicar_atualizacao, Analise, AnaliseId, Elemento, ElementoId, Procedimento, ProcedimentoId,
};
use crate::domain::impacto::{calcular_impacto, diferenca_positiva};
use crate::domain::session::{autenticar, carregar_sessao, gravar_sessao, limpar_sessao, Sessao};
use crate::infra::import::xlsx::mapear_linhas;
use crate::infra::sqlite::queries::{
    atualizar_elemento, cadastrar_procedimento, criar_analise, inserir_elementos, listar_analises,
    listar_elementos, listar_procedimentos,
};
use crate::infra::sqlite::repo::SqliteRepo;
use crate::infra::sqlite::schema::init_db;
use crate::ui::format::{exibir_numero, exibir_opcional, formatar_data, formatar_moeda};
use crate::usecase::ports::repo::{
    AnaliseRepository, ElementoUpdate, NovoElemento, RepoError,
};
use crate::usecase::services::edit_service::EditService;
use crate::usecase::services::import_service::ImportService;
use crate::*;

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("negociaai-{prefix}-{nanos}"))
}

fn novo(nome: &str) -> NovoElemento {
    NovoElemento {
        nome: Some(nome.to_string()),
        ..NovoElemento::default()
    }
}

fn elemento_basico(id: i64) -> Elemento {
    Elemento {
        id: ElementoId(id),
        analise_id: AnaliseId(1),
        created_at: "2025-01-01 00:00:00".to_string(),
        tipo: None,
        nome: Some(format!("item-{id}")),
        freq: None,
        custo_unit: None,
        custo_total: None,
        status: None,
        valor_proposto: None,
        id_gold_label: None,
        gold_label_nome: None,
        gold_label_valor: None,
    }
}

#[test]
fn init_db_creates_required_tables() {
    let temp_dir = unique_test_dir("init-db");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let result = init_db(&db_path);

    assert!(result.is_ok(), "init_db should succeed: {result:?}");

    let conn = Connection::open(&db_path).expect("should open sqlite db");
    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('analise','procedimento','elemento')",
            [],
            |row| row.get(0),
        )
        .expect("table count query should succeed");

    assert_eq!(table_count, 3, "required tables should exist");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn listar_analises_returns_newest_first() {
    let temp_dir = unique_test_dir("listar-analises");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let primeira = criar_analise(&db_path, "primeira.xlsx").expect("should create analise");
    let segunda = criar_analise(&db_path, "segunda.xlsx").expect("should create analise");

    let analises = listar_analises(&db_path).expect("should list analises");

    assert_eq!(analises.len(), 2);
    assert_eq!(analises[0].id, segunda.id, "newest analise should come first");
    assert_eq!(analises[0].filename, "segunda.xlsx");
    assert_eq!(analises[1].id, primeira.id);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn inserir_elementos_preserves_insertion_order() {
    let temp_dir = unique_test_dir("inserir-elementos");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let analise = criar_analise(&db_path, "a.xlsx").expect("should create analise");
    let outra = criar_analise(&db_path, "b.xlsx").expect("should create analise");

    let count = inserir_elementos(
        &db_path,
        analise.id.0,
        &[novo("consulta"), novo("exame"), novo("retorno")],
    )
    .expect("should insert elementos");
    inserir_elementos(&db_path, outra.id.0, &[novo("alheio")])
        .expect("should insert elementos");

    assert_eq!(count, 3);

    let elementos = listar_elementos(&db_path, analise.id.0).expect("should list elementos");
    let nomes: Vec<&str> = elementos
        .iter()
        .map(|el| el.nome.as_deref().unwrap_or(""))
        .collect();

    assert_eq!(nomes, vec!["consulta", "exame", "retorno"]);
    assert!(
        elementos.iter().all(|el| el.analise_id == analise.id),
        "rows from another analise must not leak in"
    );

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn gold_label_fields_are_denormalized_from_procedimento() {
    let temp_dir = unique_test_dir("gold-label-join");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let analise = criar_analise(&db_path, "a.xlsx").expect("should create analise");
    inserir_elementos(&db_path, analise.id.0, &[novo("consulta")])
        .expect("should insert elemento");
    let proc_id = cadastrar_procedimento(&db_path, "Consulta Padrão", Some(150.0))
        .expect("should create procedimento");

    let elementos = listar_elementos(&db_path, analise.id.0).expect("should list elementos");
    assert_eq!(elementos[0].gold_label_nome, None, "no reference assigned yet");

    atualizar_elemento(
        &db_path,
        elementos[0].id.0,
        &ElementoUpdate::GoldLabel(Some(proc_id)),
    )
    .expect("should assign gold label");

    let elementos = listar_elementos(&db_path, analise.id.0).expect("should list elementos");
    assert_eq!(elementos[0].id_gold_label, Some(ProcedimentoId(proc_id)));
    assert_eq!(
        elementos[0].gold_label_nome.as_deref(),
        Some("Consulta Padrão")
    );
    assert_eq!(elementos[0].gold_label_valor, Some(150.0));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn atualizar_elemento_touches_only_the_named_field() {
    let temp_dir = unique_test_dir("atualizar-elemento");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let analise = criar_analise(&db_path, "a.xlsx").expect("should create analise");
    inserir_elementos(
        &db_path,
        analise.id.0,
        &[NovoElemento {
            nome: Some("consulta".to_string()),
            status: Some("pendente".to_string()),
            custo_unit: Some(100.0),
            ..NovoElemento::default()
        }],
    )
    .expect("should insert elemento");

    let id = listar_elementos(&db_path, analise.id.0).expect("should list elementos")[0]
        .id
        .0;

    atualizar_elemento(&db_path, id, &ElementoUpdate::ValorProposto(Some(90.0)))
        .expect("should update valor_proposto");

    let elemento = listar_elementos(&db_path, analise.id.0).expect("should list elementos")
        .remove(0);
    assert_eq!(elemento.valor_proposto, Some(90.0));
    assert_eq!(elemento.status.as_deref(), Some("pendente"), "other fields untouched");
    assert_eq!(elemento.custo_unit, Some(100.0));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn atualizar_elemento_rejects_unknown_id() {
    let temp_dir = unique_test_dir("atualizar-unknown");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    init_db(&db_path).expect("init_db should succeed");

    let result = atualizar_elemento(&db_path, 999, &ElementoUpdate::Status(None));

    assert!(result.is_err(), "updating a missing elemento should fail");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn listar_procedimentos_orders_by_nome() {
    let temp_dir = unique_test_dir("listar-procedimentos");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    cadastrar_procedimento(&db_path, "Ultrassom", None).expect("should create procedimento");
    cadastrar_procedimento(&db_path, "Consulta", Some(80.0))
        .expect("should create procedimento");
    cadastrar_procedimento(&db_path, "Raio-X", Some(120.0)).expect("should create procedimento");

    let procedimentos = listar_procedimentos(&db_path).expect("should list procedimentos");
    let nomes: Vec<&str> = procedimentos.iter().map(|p| p.nome.as_str()).collect();

    assert_eq!(nomes, vec!["Consulta", "Raio-X", "Ultrassom"]);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn calcular_impacto_derives_per_row_and_aggregate() {
    let mut com_proposta = elemento_basico(1);
    com_proposta.freq = Some(2.0);
    com_proposta.custo_unit = Some(100.0);
    com_proposta.custo_total = Some(200.0);
    com_proposta.valor_proposto = Some(90.0);

    let sem_proposta = elemento_basico(2);

    let resumo = calcular_impacto(&[com_proposta, sem_proposta]);

    assert_eq!(resumo.linhas.len(), 1, "rows without a proposal are excluded");
    let linha = &resumo.linhas[0];
    assert_eq!(linha.total_proposto, 180.0);
    assert_eq!(linha.diferenca_total, -20.0);
    assert_eq!(resumo.impacto_total, Some(-20.0));
}

#[test]
fn calcular_impacto_defaults_missing_freq_and_custo_total() {
    let mut elemento = elemento_basico(1);
    elemento.valor_proposto = Some(50.0);

    let resumo = calcular_impacto(&[elemento]);

    let linha = &resumo.linhas[0];
    assert_eq!(linha.total_proposto, 50.0, "missing freq defaults to 1");
    assert_eq!(linha.diferenca_total, 50.0, "missing custo_total defaults to 0");
}

#[test]
fn calcular_impacto_on_empty_selection_has_no_aggregate() {
    let resumo = calcular_impacto(&[elemento_basico(1), elemento_basico(2)]);

    assert!(resumo.linhas.is_empty());
    assert_eq!(resumo.impacto_total, None, "absent aggregate, not zero");
    assert_eq!(formatar_moeda(resumo.impacto_total), "N/A");
}

#[test]
fn diferenca_positiva_is_strictly_greater_than_zero() {
    assert!(diferenca_positiva(0.01));
    assert!(!diferenca_positiva(0.0));
    assert!(!diferenca_positiva(-5.0));
}

#[test]
fn cell_editor_stages_empty_string_for_absent_value() {
    let mut editor = CellEditor::new(FieldValue::Numero(None));

    editor.begin_edit();

    assert!(editor.is_editing());
    assert_eq!(editor.staged(), "", "absent value stages as empty, not \"0\"");

    editor.set_staged("99".to_string());
    editor.cancel();

    assert_eq!(editor.committed(), &FieldValue::Numero(None));
    assert_eq!(exibir_numero(&None), "-", "canceled cell shows the dash again");
}

#[test]
fn cell_editor_commit_parses_decimal_comma() {
    let mut editor = CellEditor::new(FieldValue::Numero(Some(10.0)));
    editor.begin_edit();
    editor.set_staged("42,5".to_string());

    let committed = editor.commit().expect("comma decimal should parse");

    assert_eq!(committed, FieldValue::Numero(Some(42.5)));
    assert!(!editor.is_editing(), "commit leaves edit mode");
    assert_eq!(
        editor.committed(),
        &FieldValue::Numero(Some(10.0)),
        "committed value only moves on acknowledge"
    );
}

#[test]
fn cell_editor_rejects_invalid_number_and_stays_editing() {
    let mut editor = CellEditor::new(FieldValue::Numero(Some(10.0)));
    editor.begin_edit();
    editor.set_staged("abc".to_string());

    let result = editor.commit();

    assert!(result.is_err(), "non-numeric input must not commit");
    assert!(editor.is_editing(), "rejection keeps the editor open");
    assert_eq!(editor.staged(), "abc", "staged text is kept for correction");
}

#[test]
fn cell_editor_cancel_discards_staged_text() {
    let mut editor = CellEditor::new(FieldValue::Texto(Some("antes".to_string())));
    editor.begin_edit();
    editor.set_staged("depois".to_string());

    editor.cancel();

    assert!(!editor.is_editing());
    assert_eq!(editor.committed(), &FieldValue::Texto(Some("antes".to_string())));
}

#[test]
fn cell_editor_ignores_staged_input_while_viewing() {
    let mut editor = CellEditor::new(FieldValue::Texto(None));

    editor.set_staged("ruído".to_string());

    assert!(!editor.is_editing());
    assert_eq!(
        editor.commit().expect("commit while viewing is a no-op"),
        FieldValue::Texto(None)
    );
}

#[test]
fn parse_staged_maps_empty_input_to_absent_values() {
    assert_eq!(
        parse_staged(FieldKind::Texto, "  ").expect("empty text should parse"),
        FieldValue::Texto(None)
    );
    assert_eq!(
        parse_staged(FieldKind::Numero, "").expect("empty number should parse"),
        FieldValue::Numero(None)
    );
    assert_eq!(
        parse_staged(FieldKind::Selecao, "").expect("empty selection should parse"),
        FieldValue::Selecao(None)
    );
}

#[test]
fn parse_staged_yields_floats_for_numeric_input() {
    assert_eq!(
        parse_staged(FieldKind::Numero, "42.5").expect("dot decimal should parse"),
        FieldValue::Numero(Some(42.5))
    );
    assert!(parse_staged(FieldKind::Numero, "abc").is_err());
    assert!(parse_staged(FieldKind::Numero, "inf").is_err(), "non-finite input is rejected");
}

#[test]
fn parse_staged_converts_selection_ids() {
    assert_eq!(
        parse_staged(FieldKind::Selecao, "7").expect("id should parse"),
        FieldValue::Selecao(Some(7))
    );
    assert!(parse_staged(FieldKind::Selecao, "sete").is_err());
}

#[test]
fn aplicar_atualizacao_merges_only_the_matching_row() {
    let mut elementos = vec![elemento_basico(1), elemento_basico(2)];

    let aplicado = aplicar_atualizacao(
        &mut elementos,
        ElementoId(2),
        &ElementoUpdate::ValorProposto(Some(75.0)),
    );

    assert!(aplicado);
    assert_eq!(elementos[0].valor_proposto, None);
    assert_eq!(elementos[1].valor_proposto, Some(75.0));

    let ausente = aplicar_atualizacao(
        &mut elementos,
        ElementoId(99),
        &ElementoUpdate::Status(Some("ok".to_string())),
    );
    assert!(!ausente, "missing id reports false and mutates nothing");
}

struct FailingRepo;

impl AnaliseRepository for FailingRepo {
    fn init(&self) -> Result<(), RepoError> {
        Ok(())
    }

    fn listar_analises(&self) -> Result<Vec<Analise>, RepoError> {
        Err(RepoError::Fetch("indisponível".to_string()))
    }

    fn criar_analise(&self, _filename: &str) -> Result<Analise, RepoError> {
        Err(RepoError::Update("indisponível".to_string()))
    }

    fn listar_elementos(&self, _analise_id: AnaliseId) -> Result<Vec<Elemento>, RepoError> {
        Err(RepoError::Fetch("indisponível".to_string()))
    }

    fn inserir_elementos(
        &self,
        _analise_id: AnaliseId,
        _elementos: &[NovoElemento],
    ) -> Result<i64, RepoError> {
        Err(RepoError::Update("indisponível".to_string()))
    }

    fn atualizar_elemento(
        &self,
        _id: ElementoId,
        _update: &ElementoUpdate,
    ) -> Result<(), RepoError> {
        Err(RepoError::Update("indisponível".to_string()))
    }

    fn listar_procedimentos(&self) -> Result<Vec<Procedimento>, RepoError> {
        Err(RepoError::Fetch("indisponível".to_string()))
    }

    fn cadastrar_procedimento(
        &self,
        _nome: &str,
        _valor_minimo: Option<f64>,
    ) -> Result<ProcedimentoId, RepoError> {
        Err(RepoError::Update("indisponível".to_string()))
    }
}

#[test]
fn failed_update_keeps_the_pre_edit_value() {
    let service = EditService::new(Arc::new(FailingRepo));
    let mut elementos = vec![elemento_basico(1)];
    let update = ElementoUpdate::ValorProposto(Some(90.0));

    let resultado = service.atualizar_elemento(ElementoId(1), &update);

    assert!(matches!(resultado, Err(RepoError::Update(_))));

    // The view merges only after an acknowledged write.
    if resultado.is_ok() {
        aplicar_atualizacao(&mut elementos, ElementoId(1), &update);
    }
    assert_eq!(elementos[0].valor_proposto, None);
}

#[test]
fn edit_service_round_trips_through_sqlite() {
    let temp_dir = unique_test_dir("edit-service");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let repo: Arc<dyn AnaliseRepository> = Arc::new(SqliteRepo {
        db_path: db_path.clone(),
    });
    repo.init().expect("init should succeed");
    let analise = repo.criar_analise("a.xlsx").expect("should create analise");
    repo.inserir_elementos(analise.id, &[novo("consulta")])
        .expect("should insert elemento");
    let id = repo
        .listar_elementos(analise.id)
        .expect("should list elementos")[0]
        .id;

    let service = EditService::new(repo.clone());
    service
        .atualizar_elemento(id, &ElementoUpdate::Status(Some("revisado".to_string())))
        .expect("update should succeed");

    let elementos = repo.listar_elementos(analise.id).expect("should list elementos");
    assert_eq!(elementos[0].status.as_deref(), Some("revisado"));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn import_service_rejects_unsupported_extensions() {
    let service = ImportService::new(Arc::new(FailingRepo));

    let resultado = service.importar(Path::new("planilha.csv"));

    assert!(resultado.is_err(), "only .xlsx/.xls are accepted");
}

#[test]
fn autenticar_checks_the_allow_list() {
    assert!(autenticar("sakajiri", "saka@4599.123").is_some());
    assert!(autenticar("juan.gargiulo", "juan@1189.32").is_some());
    assert!(autenticar("sakajiri", "senha-errada").is_none());
    assert!(autenticar("desconhecido", "saka@4599.123").is_none());
}

#[test]
fn session_token_round_trips_through_the_data_dir() {
    let temp_dir = unique_test_dir("sessao");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");

    assert!(carregar_sessao(&temp_dir).is_none(), "no token file yet");

    let sessao = Sessao {
        token: "sakajiri:abc123".to_string(),
    };
    gravar_sessao(&temp_dir, &sessao).expect("should persist session");

    let carregada = carregar_sessao(&temp_dir).expect("should load persisted session");
    assert_eq!(carregada, sessao);

    limpar_sessao(&temp_dir).expect("should remove session");
    assert!(carregar_sessao(&temp_dir).is_none());

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn mapear_linhas_matches_columns_by_header_name() {
    let headers = vec![
        "Tipo de procedimento".to_string(),
        "Nome do procedimento".to_string(),
        "Frequência".to_string(),
        "Custo Unitário".to_string(),
        "Custo Total".to_string(),
        "Status".to_string(),
        "Observações".to_string(),
    ];
    let rows = vec![
        vec![
            "Consulta".to_string(),
            "Clínico geral".to_string(),
            "2".to_string(),
            "R$ 1.234,56".to_string(),
            "2469.12".to_string(),
            "pendente".to_string(),
            "ignorada".to_string(),
        ],
        vec![String::new(), String::new(), String::new()],
    ];

    let elementos = mapear_linhas(&headers, &rows);

    assert_eq!(elementos.len(), 1, "rows with no content are skipped");
    let elemento = &elementos[0];
    assert_eq!(elemento.tipo.as_deref(), Some("Consulta"));
    assert_eq!(elemento.nome.as_deref(), Some("Clínico geral"));
    assert_eq!(elemento.freq, Some(2.0));
    assert_eq!(elemento.custo_unit, Some(1234.56), "pt-BR currency is normalized");
    assert_eq!(elemento.custo_total, Some(2469.12), "plain decimals parse as-is");
    assert_eq!(elemento.status.as_deref(), Some("pendente"));
}

#[test]
fn agrupar_por_gold_label_splits_into_three_tables() {
    let mut acima = elemento_basico(1);
    acima.custo_unit = Some(100.0);
    acima.gold_label_valor = Some(100.0 * MARGEM_GOLD_LABEL);

    let mut abaixo = elemento_basico(2);
    abaixo.custo_unit = Some(100.0);
    abaixo.gold_label_valor = Some(101.0);

    let sem = elemento_basico(3);

    let mut gold_zerado = elemento_basico(4);
    gold_zerado.custo_unit = Some(100.0);
    gold_zerado.gold_label_valor = Some(0.0);

    let grupos = agrupar_por_gold_label(&[acima, abaixo, sem, gold_zerado]);

    assert_eq!(grupos.acima.len(), 1);
    assert_eq!(grupos.acima[0].id, ElementoId(1));
    assert_eq!(grupos.abaixo_ou_igual.len(), 1);
    assert_eq!(grupos.abaixo_ou_igual[0].id, ElementoId(2));
    assert_eq!(
        grupos.sem_gold_label.len(),
        2,
        "a zero suggested value counts as absent"
    );
}

#[test]
fn formatar_moeda_renders_pt_br_currency() {
    assert_eq!(formatar_moeda(Some(1234.5)), "R$ 1.234,50");
    assert_eq!(formatar_moeda(Some(1_000_000.0)), "R$ 1.000.000,00");
    assert_eq!(formatar_moeda(Some(-20.0)), "-R$ 20,00");
    assert_eq!(formatar_moeda(Some(0.0)), "R$ 0,00");
    assert_eq!(formatar_moeda(None), "N/A");
}

#[test]
fn exibir_helpers_mark_absent_values_with_a_dash() {
    assert_eq!(exibir_opcional(&Some("texto".to_string())), "texto");
    assert_eq!(exibir_opcional::<String>(&None), "-");
    assert_eq!(exibir_numero(&Some(2.0)), "2");
    assert_eq!(exibir_numero(&Some(2.5)), "2.5");
    assert_eq!(exibir_numero(&None), "-");
}

#[test]
fn formatar_data_localizes_store_timestamps() {
    assert_eq!(
        formatar_data("2025-03-09 14:30:00"),
        "09/03/2025 às 14:30"
    );
    assert_eq!(formatar_data("sem formato"), "sem formato");
}

#[test]
fn default_db_path_uses_app_data_directory() {
    let db_path = default_db_path().expect("default db path should resolve");
    let app_dir = db_path
        .parent()
        .and_then(|path| path.file_name())
        .and_then(|name| name.to_str())
        .expect("db path should include app directory");

    assert_eq!(
        db_path.file_name().and_then(|name| name.to_str()),
        Some("analises.sqlite")
    );
    assert_eq!(app_dir, "custos");
}
