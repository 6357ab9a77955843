use crate::schema::Attendance;

pub const FULL_NAME_REQUIRED: &str = "El nombre completo es requerido.";
pub const WHATSAPP_INVALID: &str = "Número de WhatsApp inválido.";
pub const ATTENDING_REQUIRED: &str = "Por favor selecciona si asistirás o no.";
pub const ATTENDING_INVALID: &str = "Opción de asistencia inválida.";
pub const GUEST_NAMES_INVALID: &str = "La lista de acompañantes no es válida.";
pub const COMPANION_EMPTY: &str =
    "El nombre del acompañante no puede estar vacío si se añade el campo.";

pub const FIX_ERRORS: &str = "Por favor corrige los errores en el formulario.";

pub const THANKS_ATTENDING: &str =
    "¡Gracias por confirmar tu asistencia! Nos vemos en la celebración.";
pub const THANKS_DECLINED: &str = "Lamentamos que no puedas asistir. ¡Gracias por responder!";

pub const RECORDED_SUFFIX: &str = "Tu respuesta ha sido registrada.";
pub const DEMO_MODE_SUFFIX: &str = "(Nota: La integración con Google Sheets no está configurada completamente. Define SHEET_WEBHOOK_URL en el servidor).";

pub const SUCCESS_TITLE: &str = "¡Confirmación Enviada!";
pub const FAILURE_TITLE: &str = "Error en la Confirmación";
pub const FAILURE_FALLBACK: &str =
    "Hubo un problema al enviar tu confirmación. Intenta de nuevo.";

pub const COMPANION_WARNING_TITLE: &str = "Aviso Importante sobre Acompañantes";
pub const COMPANION_WARNING: &str = "Para acompañantes no autorizados previamente, por favor consúltanos antes para coordinar bien todos los detalles del evento. ¡Mil gracias por tu comprensión!";

pub const UNKNOWN_SERVER_ERROR: &str = "Error en la respuesta del servidor.";
pub const UNKNOWN_NETWORK_ERROR: &str =
    "Ocurrió un error de red o desconocido al enviar tu confirmación.";

pub fn thank_you(attending: Attendance) -> &'static str {
    match attending {
        Attendance::Yes => THANKS_ATTENDING,
        Attendance::No => THANKS_DECLINED,
    }
}

pub fn recorded(attending: Attendance) -> String {
    format!("{} {RECORDED_SUFFIX}", thank_you(attending))
}

pub fn demo_mode(attending: Attendance) -> String {
    format!("{} {DEMO_MODE_SUFFIX}", thank_you(attending))
}

pub fn remote_rejected(detail: &str) -> String {
    format!(
        "Hubo un problema al guardar tu confirmación en Google Sheets: {detail}. Por favor, intenta de nuevo o contacta al organizador."
    )
}

pub fn remote_rejected_notice(detail: &str) -> String {
    format!("Error del servidor: {detail}")
}

pub fn transport_failed(detail: &str) -> String {
    format!("Error: {detail}. Por favor, intenta de nuevo o contacta al organizador.")
}
