//! Internationalization (i18n) module.
//!
//! Provides localized strings for validation messages and CLI output.
//! English is the default language; Spanish is available as an alternative.

use std::sync::OnceLock;

static CURRENT_LANG: OnceLock<Lang> = OnceLock::new();

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// English (default)
    En,
    /// Spanish
    Es,
}

impl Lang {
    /// Parse a language code string (e.g. "en", "es", "en_US", "es_ES").
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.to_lowercase();
        let prefix = normalized.split(['_', '-']).next().unwrap_or("");
        match prefix {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    /// Return the ISO 639-1 code for this language.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

/// Initialize the global language. Call once at startup.
/// If already initialized, this is a no-op.
pub fn set_lang(lang: Lang) {
    let _ = CURRENT_LANG.set(lang);
}

/// Get the currently configured language (defaults to English).
pub fn lang() -> Lang {
    CURRENT_LANG.get().copied().unwrap_or(Lang::En)
}

/// Detect language from `OUTREACHKIT_LANG`, then `LC_MESSAGES` / `LANG`.
pub fn detect_system_lang() -> Lang {
    std::env::var("OUTREACHKIT_LANG")
        .ok()
        .and_then(|v| Lang::from_code(&v))
        .or_else(|| {
            std::env::var("LC_MESSAGES")
                .ok()
                .and_then(|v| Lang::from_code(&v))
        })
        .or_else(|| std::env::var("LANG").ok().and_then(|v| Lang::from_code(&v)))
        .unwrap_or(Lang::En)
}

/// Macro for defining translatable message functions.
/// Each function returns a `&'static str` based on the current language.
macro_rules! msg {
    ($name:ident, $en:expr, $es:expr) => {
        /// Returns a localized string for the current language.
        pub fn $name() -> &'static str {
            match lang() {
                Lang::En => $en,
                Lang::Es => $es,
            }
        }
    };
}

// ── General ──────────────────────────────────────────────────────

msg!(
    app_about,
    "outreachkit \u{2014} Validate outreach message templates before they are sent.",
    "outreachkit \u{2014} Valida plantillas de mensajes de prospecci\u{f3}n antes de enviarlas."
);
msg!(
    app_long_about,
    "outreachkit \u{2014} Validate outreach message templates before they are sent.\nChecks {{placeholder}} snippets against the variable catalog, keeps fallback\ntext free of placeholders, enforces per-channel length limits and\nattachment count, size and type constraints.",
    "outreachkit \u{2014} Valida plantillas de mensajes de prospecci\u{f3}n antes de enviarlas.\nComprueba los {{marcadores}} contra el cat\u{e1}logo de variables, mantiene el\ntexto alternativo libre de marcadores, aplica los l\u{ed}mites de longitud por\ncanal y las restricciones de n\u{fa}mero, tama\u{f1}o y tipo de adjuntos."
);

// ── CLI help strings ─────────────────────────────────────────────

msg!(
    help_cmd_check,
    "Validate a template file and its attachments",
    "Validar un fichero de plantilla y sus adjuntos"
);
msg!(
    help_cmd_variables,
    "List the placeholder variables that may be used",
    "Listar las variables de marcador permitidas"
);
msg!(
    help_cmd_attach,
    "Check a batch of files against the attachment constraints",
    "Comprobar un lote de ficheros contra las restricciones de adjuntos"
);
msg!(
    help_cmd_completions,
    "Generate shell completions",
    "Generar autocompletado para la shell"
);
msg!(help_cmd_manpage, "Generate a man page", "Generar p\u{e1}gina de manual");

// ── Snippet validation ───────────────────────────────────────────

msg!(
    err_unmatched_markers,
    "Every {{ must be closed by a matching }}",
    "Cada {{ debe cerrarse con su }} correspondiente"
);
msg!(
    err_stray_brace,
    "Braces may only appear as part of a {{variable}} placeholder",
    "Las llaves solo pueden aparecer dentro de un marcador {{variable}}"
);
msg!(
    err_unknown_variable,
    "Unknown variable",
    "Variable desconocida"
);
msg!(
    err_placeholder_in_fallback,
    "Fallback text cannot contain placeholders or braces",
    "El texto alternativo no puede contener marcadores ni llaves"
);

// ── Required fields ──────────────────────────────────────────────

msg!(field_subject, "Subject", "Asunto");
msg!(field_body, "Message", "Mensaje");
msg!(field_fallback_subject, "Fallback subject", "Asunto alternativo");
msg!(field_fallback_body, "Fallback message", "Mensaje alternativo");
msg!(field_attachments, "Attachments", "Adjuntos");
msg!(err_is_required, "is required", "es obligatorio");

// ── Attachment rejections ────────────────────────────────────────

msg!(
    err_unsupported_type,
    "unsupported file type",
    "tipo de fichero no admitido"
);
msg!(
    err_exceeds_size,
    "exceeds size limit",
    "supera el tama\u{f1}o m\u{e1}ximo"
);
msg!(
    err_total_exceeds,
    "total size exceeds limit",
    "el tama\u{f1}o total supera el l\u{ed}mite"
);

/// "maximum N files allowed", localized.
pub fn err_max_files(max: usize) -> String {
    match lang() {
        Lang::En => format!("maximum {max} files allowed"),
        Lang::Es => format!("se permite un m\u{e1}ximo de {max} ficheros"),
    }
}

/// "<field> is too long (N / M characters)", localized.
pub fn err_length(field: &str, len: usize, max: usize) -> String {
    match lang() {
        Lang::En => format!("{field} is too long ({len} / {max} characters)"),
        Lang::Es => format!("{field} es demasiado largo ({len} / {max} caracteres)"),
    }
}

// ── CLI output ───────────────────────────────────────────────────

msg!(err_file_not_found, "File not found", "Fichero no encontrado");
msg!(cli_template_ok, "Template is ready to submit", "La plantilla est\u{e1} lista para enviar");
msg!(
    cli_template_invalid,
    "Template cannot be submitted",
    "La plantilla no se puede enviar"
);
msg!(cli_template, "Template", "Plantilla");
msg!(cli_kind, "Kind", "Tipo");
msg!(cli_char_limit, "Character limit", "L\u{ed}mite de caracteres");
msg!(cli_accepted, "Accepted", "Aceptados");
msg!(cli_rejected, "Rejected", "Rechazados");
msg!(cli_col_label, "Label", "Etiqueta");
msg!(cli_col_token, "Token", "Marcador");
msg!(cli_all_files, "(all files)", "(todos los ficheros)");
