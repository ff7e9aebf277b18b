use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::params;

use crate::domain::entities::elemento::{
    Analise, AnaliseId, Elemento, ElementoId, Procedimento, ProcedimentoId,
};
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::usecase::ports::repo::{ElementoUpdate, NovoElemento};

pub fn listar_analises(db_path: &Path) -> Result<Vec<Analise>> {
    init_db(db_path)?;
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT id, filename, created_at
             FROM analise
             ORDER BY created_at DESC, id DESC",
        )
        .context("failed to prepare analises query")?;

    let analises = stmt
        .query_map([], |row| {
            Ok(Analise {
                id: AnaliseId(row.get(0)?),
                filename: row.get(1)?,
                created_at: row.get(2)?,
            })
        })
        .context("failed to query analises")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect analises")?;

    Ok(analises)
}

pub fn criar_analise(db_path: &Path, filename: &str) -> Result<Analise> {
    init_db(db_path)?;
    let conn = open_connection(db_path)?;
    conn.execute(
        "INSERT INTO analise(filename) VALUES (?1)",
        params![filename],
    )
    .context("failed to insert analise")?;
    let id = conn.last_insert_rowid();

    conn.query_row(
        "SELECT id, filename, created_at FROM analise WHERE id = ?1",
        params![id],
        |row| {
            Ok(Analise {
                id: AnaliseId(row.get(0)?),
                filename: row.get(1)?,
                created_at: row.get(2)?,
            })
        },
    )
    .context("failed to read back created analise")
}

/// Elementos in insertion order with the gold-label name and minimum value
/// denormalized from the referenced Procedimento.
pub fn listar_elementos(db_path: &Path, analise_id: i64) -> Result<Vec<Elemento>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT el.id, el.analise_id, el.created_at, el.tipo, el.nome,
                    el.freq, el.custo_unit, el.custo_total, el.status,
                    el.valor_proposto, el.id_gold_label,
                    proc.nome, proc.valor_minimo
             FROM elemento el
             LEFT JOIN procedimento proc ON proc.id = el.id_gold_label
             WHERE el.analise_id = ?1
             ORDER BY el.id ASC",
        )
        .context("failed to prepare elementos query")?;

    let elementos = stmt
        .query_map([analise_id], |row| {
            Ok(Elemento {
                id: ElementoId(row.get(0)?),
                analise_id: AnaliseId(row.get(1)?),
                created_at: row.get(2)?,
                tipo: row.get(3)?,
                nome: row.get(4)?,
                freq: row.get(5)?,
                custo_unit: row.get(6)?,
                custo_total: row.get(7)?,
                status: row.get(8)?,
                valor_proposto: row.get(9)?,
                id_gold_label: row.get::<_, Option<i64>>(10)?.map(ProcedimentoId),
                gold_label_nome: row.get(11)?,
                gold_label_valor: row.get(12)?,
            })
        })
        .context("failed to query elementos")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect elementos")?;

    Ok(elementos)
}

pub fn inserir_elementos(
    db_path: &Path,
    analise_id: i64,
    elementos: &[NovoElemento],
) -> Result<i64> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start elemento insert transaction")?;

    let mut insert_stmt = tx
        .prepare(
            "INSERT INTO elemento(analise_id, tipo, nome, freq, custo_unit, custo_total, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .context("failed to prepare elemento insert")?;

    for elemento in elementos {
        insert_stmt
            .execute(params![
                analise_id,
                elemento.tipo,
                elemento.nome,
                elemento.freq,
                elemento.custo_unit,
                elemento.custo_total,
                elemento.status,
            ])
            .context("failed to insert elemento")?;
    }
    drop(insert_stmt);

    tx.commit().context("failed to commit elemento inserts")?;
    Ok(elementos.len() as i64)
}

/// Single-column UPDATE per variant. The match is exhaustive over the
/// update union, so a new editable attribute cannot be forgotten here.
pub fn atualizar_elemento(db_path: &Path, id: i64, update: &ElementoUpdate) -> Result<()> {
    let conn = open_connection(db_path)?;
    let changed = match update {
        ElementoUpdate::Tipo(valor) => conn.execute(
            "UPDATE elemento SET tipo = ?1 WHERE id = ?2",
            params![valor, id],
        ),
        ElementoUpdate::Nome(valor) => conn.execute(
            "UPDATE elemento SET nome = ?1 WHERE id = ?2",
            params![valor, id],
        ),
        ElementoUpdate::Freq(valor) => conn.execute(
            "UPDATE elemento SET freq = ?1 WHERE id = ?2",
            params![valor, id],
        ),
        ElementoUpdate::CustoUnit(valor) => conn.execute(
            "UPDATE elemento SET custo_unit = ?1 WHERE id = ?2",
            params![valor, id],
        ),
        ElementoUpdate::CustoTotal(valor) => conn.execute(
            "UPDATE elemento SET custo_total = ?1 WHERE id = ?2",
            params![valor, id],
        ),
        ElementoUpdate::Status(valor) => conn.execute(
            "UPDATE elemento SET status = ?1 WHERE id = ?2",
            params![valor, id],
        ),
        ElementoUpdate::ValorProposto(valor) => conn.execute(
            "UPDATE elemento SET valor_proposto = ?1 WHERE id = ?2",
            params![valor, id],
        ),
        ElementoUpdate::GoldLabel(valor) => conn.execute(
            "UPDATE elemento SET id_gold_label = ?1 WHERE id = ?2",
            params![valor, id],
        ),
    }
    .with_context(|| format!("failed to update elemento #{id}"))?;

    if changed == 0 {
        anyhow::bail!("elemento #{id} not found");
    }
    Ok(())
}

pub fn listar_procedimentos(db_path: &Path) -> Result<Vec<Procedimento>> {
    init_db(db_path)?;
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT id, nome, valor_minimo
             FROM procedimento
             ORDER BY nome ASC",
        )
        .context("failed to prepare procedimentos query")?;

    let procedimentos = stmt
        .query_map([], |row| {
            Ok(Procedimento {
                id: ProcedimentoId(row.get(0)?),
                nome: row.get(1)?,
                valor_minimo: row.get(2)?,
            })
        })
        .context("failed to query procedimentos")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect procedimentos")?;

    Ok(procedimentos)
}

pub fn cadastrar_procedimento(
    db_path: &Path,
    nome: &str,
    valor_minimo: Option<f64>,
) -> Result<i64> {
    init_db(db_path)?;
    let conn = open_connection(db_path)?;
    conn.execute(
        "INSERT INTO procedimento(nome, valor_minimo) VALUES (?1, ?2)",
        params![nome, valor_minimo],
    )
    .context("failed to insert procedimento")?;
    Ok(conn.last_insert_rowid())
}
