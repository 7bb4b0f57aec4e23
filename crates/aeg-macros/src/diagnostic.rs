use aeg_core::diagnostics::{DiagnosticMessage, MessageId, Severity};

/// Domain shared by every diagnostic the AppEnum macros emit.
pub const DIAGNOSTIC_DOMAIN: &str = "de.amaider.SwiftMacros";

pub const FIX_IT_DOMAIN: &str = "AmaiderMacroFixIt";
pub const FIX_IT_MESSAGE: &str = "Update AppEnum";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnumDiagnostic {
    NotAnEnum,
    UpdatedInheritancesIsNil,
    ReplaceEnum,
}

impl AppEnumDiagnostic {
    pub fn id(&self) -> &'static str {
        match self {
            AppEnumDiagnostic::NotAnEnum => "notAnEnum",
            AppEnumDiagnostic::UpdatedInheritancesIsNil => "updatedInheritancesIsNil",
            AppEnumDiagnostic::ReplaceEnum => "replaceEnum",
        }
    }
}

impl DiagnosticMessage for AppEnumDiagnostic {
    fn message(&self) -> String {
        match self {
            AppEnumDiagnostic::NotAnEnum => "'@AppEnumGen' can only be applied to an 'enum'",
            AppEnumDiagnostic::UpdatedInheritancesIsNil => "Somehow updatedInheritances is nil",
            AppEnumDiagnostic::ReplaceEnum => "Replace the enum with the macro expansion",
        }
        .to_string()
    }

    fn diagnostic_id(&self) -> MessageId {
        MessageId::new(DIAGNOSTIC_DOMAIN, self.id())
    }

    fn severity(&self) -> Severity {
        match self {
            AppEnumDiagnostic::NotAnEnum | AppEnumDiagnostic::UpdatedInheritancesIsNil => {
                Severity::Error
            }
            AppEnumDiagnostic::ReplaceEnum => Severity::Warning,
        }
    }
}

/// Identifier of the "Update AppEnum" fix-it.
pub fn fix_it_id() -> MessageId {
    MessageId::new(FIX_IT_DOMAIN, AppEnumDiagnostic::ReplaceEnum.id())
}
