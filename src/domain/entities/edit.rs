/// The kind a cell declares for its value. Commit-time coercion is
/// exhaustive over these variants, so an edit can never silently change
/// the type a field stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Texto,
    Numero,
    Selecao,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Texto(Option<String>),
    Numero(Option<f64>),
    Selecao(Option<i64>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Texto(_) => FieldKind::Texto,
            FieldValue::Numero(_) => FieldKind::Numero,
            FieldValue::Selecao(_) => FieldKind::Selecao,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            FieldValue::Texto(None) | FieldValue::Numero(None) | FieldValue::Selecao(None)
        )
    }

    /// Stringified form used to seed the edit buffer. Absent values stage
    /// as the empty string, never as "0" or "null".
    pub fn staged_text(&self) -> String {
        match self {
            FieldValue::Texto(Some(texto)) => texto.clone(),
            FieldValue::Numero(Some(numero)) => trim_float(*numero),
            FieldValue::Selecao(Some(id)) => id.to_string(),
            _ => String::new(),
        }
    }
}

fn trim_float(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    /// The staged string is not a valid number; the editor stays in
    /// `Editing` so the user can correct it.
    NumeroInvalido(String),
    SelecaoInvalida(String),
}

impl std::fmt::Display for CommitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitError::NumeroInvalido(texto) => {
                write!(f, "valor numérico inválido: {texto:?}")
            }
            CommitError::SelecaoInvalida(texto) => {
                write!(f, "opção inválida: {texto:?}")
            }
        }
    }
}

impl std::error::Error for CommitError {}

/// Per-cell edit state machine. `Viewing` is the initial state and the
/// state after any commit or cancel; `Editing` holds the staged string.
///
/// `commit` only parses and leaves edit mode — the committed value changes
/// exclusively through `acknowledge`, which the owning view calls after the
/// collaborator update succeeded. One update request per commit, zero per
/// cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct CellEditor {
    committed: FieldValue,
    staged: Option<String>,
}

impl CellEditor {
    pub fn new(committed: FieldValue) -> Self {
        Self {
            committed,
            staged: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.staged.is_some()
    }

    pub fn committed(&self) -> &FieldValue {
        &self.committed
    }

    pub fn staged(&self) -> &str {
        self.staged.as_deref().unwrap_or_default()
    }

    pub fn begin_edit(&mut self) {
        if self.staged.is_none() {
            self.staged = Some(self.committed.staged_text());
        }
    }

    pub fn set_staged(&mut self, texto: String) {
        if self.staged.is_some() {
            self.staged = Some(texto);
        }
    }

    /// Converts the staged string per the committed value's kind and leaves
    /// edit mode. A numeric parse failure rejects the commit and keeps the
    /// editor in `Editing` with the staged text intact.
    pub fn commit(&mut self) -> Result<FieldValue, CommitError> {
        let Some(staged) = self.staged.clone() else {
            return Ok(self.committed.clone());
        };
        let parsed = parse_staged(self.committed.kind(), &staged)?;
        self.staged = None;
        Ok(parsed)
    }

    /// Discards the staged value; the committed value is restored unchanged.
    pub fn cancel(&mut self) {
        self.staged = None;
    }

    /// Reflects a collaborator-acknowledged value back into the cell.
    pub fn acknowledge(&mut self, value: FieldValue) {
        self.committed = value;
    }
}

/// Kind-aware coercion of a staged edit buffer. Empty input always commits
/// an absent value, never zero and never an empty string stored as a value.
pub fn parse_staged(kind: FieldKind, staged: &str) -> Result<FieldValue, CommitError> {
    let trimmed = staged.trim();
    match kind {
        FieldKind::Texto => Ok(FieldValue::Texto(if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        })),
        FieldKind::Numero => {
            if trimmed.is_empty() {
                return Ok(FieldValue::Numero(None));
            }
            let numero = trimmed
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|_| CommitError::NumeroInvalido(trimmed.to_string()))?;
            if !numero.is_finite() {
                return Err(CommitError::NumeroInvalido(trimmed.to_string()));
            }
            Ok(FieldValue::Numero(Some(numero)))
        }
        FieldKind::Selecao => {
            if trimmed.is_empty() {
                return Ok(FieldValue::Selecao(None));
            }
            let id = trimmed
                .parse::<i64>()
                .map_err(|_| CommitError::SelecaoInvalida(trimmed.to_string()))?;
            Ok(FieldValue::Selecao(Some(id)))
        }
    }
}
