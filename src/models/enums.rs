use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(RecordCategory {
    Admission => "admission",
    Medication => "medication",
    Billing => "billing",
    LabResult => "lab_result",
});

str_enum!(MedicationStatus {
    Current => "current",
    Past => "past",
});

str_enum!(Gender {
    Male => "male",
    Female => "female",
});

impl RecordCategory {
    /// Every category, in home-screen order.
    pub const ALL: [RecordCategory; 4] = [
        RecordCategory::Admission,
        RecordCategory::Medication,
        RecordCategory::Billing,
        RecordCategory::LabResult,
    ];

    /// Display label, also used when records are described to the model.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admission => "出入院记录",
            Self::Medication => "药物记录",
            Self::Billing => "费用清单",
            Self::LabResult => "检验结果",
        }
    }
}

impl MedicationStatus {
    /// Status wording used in the summary prompt.
    pub fn prompt_label(status: Option<MedicationStatus>) -> &'static str {
        match status {
            Some(Self::Current) => "目前正在进行/服用",
            Some(Self::Past) => "既往/已结束",
            None => "未标注",
        }
    }
}
