use chrono::NaiveDateTime;

/// pt-BR currency: thousands separated by '.', decimals by ',', two
/// decimal places. Absent values render as "N/A".
pub fn formatar_moeda(valor: Option<f64>) -> String {
    let Some(valor) = valor else {
        return "N/A".to_string();
    };
    let negativo = valor < 0.0;
    let centavos = (valor.abs() * 100.0).round() as u64;
    let inteiro = centavos / 100;
    let fracao = centavos % 100;

    let digitos = inteiro.to_string();
    let mut agrupado = String::new();
    for (pos, ch) in digitos.chars().enumerate() {
        if pos > 0 && (digitos.len() - pos) % 3 == 0 {
            agrupado.push('.');
        }
        agrupado.push(ch);
    }

    let sinal = if negativo { "-" } else { "" };
    format!("{sinal}R$ {agrupado},{fracao:02}")
}

/// Display-mode rendering of an optional value: the literal "-" marks an
/// absent value, distinguishing it from a legitimate zero.
pub fn exibir_opcional<T: std::fmt::Display>(valor: &Option<T>) -> String {
    match valor {
        Some(valor) => valor.to_string(),
        None => "-".to_string(),
    }
}

pub fn exibir_numero(valor: &Option<f64>) -> String {
    match valor {
        Some(numero) => {
            if numero.fract().abs() < f64::EPSILON {
                format!("{}", *numero as i64)
            } else {
                numero.to_string()
            }
        }
        None => "-".to_string(),
    }
}

/// Timestamps come from the store as "YYYY-MM-DD HH:MM:SS"; shown as
/// "dd/MM/yyyy às HH:mm". Unparsable input falls back to the raw text.
pub fn formatar_data(created_at: &str) -> String {
    NaiveDateTime::parse_from_str(created_at, "%Y-%m-%d %H:%M:%S")
        .map(|data| data.format("%d/%m/%Y às %H:%M").to_string())
        .unwrap_or_else(|_| created_at.to_string())
}
