//! Encoding of personal attributes into the classifier's feature vector
//!
//! The classifier was trained on survey columns with German (and a few
//! English) names, misspellings included. Order and names
//! are fixed and must not be "corrected".

use serde::{Deserialize, Serialize};

use super::error::ModelError;

/// Number of model features
pub const FEATURE_COUNT: usize = 35;

/// Feature names in the order the classifier expects them
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Alter",
    "Geschlecht",
    "Höchster Bildungsabschluss",
    "Familienstand",
    "Verhältnis zwischen Familieneinkommen und Armut",
    "mind. 100 Zigaretten geraucht",
    "mind. einmal Alkohol getrunken",
    "wie oft wird Alkohol getrunken?",
    "Gibt es Zeiträume in denen sie täglich getrunken haben?",
    "Häufigkeit moderate körperliche Aktivitäten in Freizeit",
    "Sitzzeit pro Tag",
    "Trouble sleeping or sleeping too much",
    "Asthma",
    "COPD",
    "Athritis",
    "Herzinfarkt",
    "Schlaganfall",
    "Schilddrüsenprobleme",
    "BMI",
    "Depressive Symptome",
    "Hüftumfang (cm)",
    "Gewicht (kg)",
    "pulse",
    "sys_bp",
    "dia_bp",
    "Dauer der moderaten Aktivitäten",
    "Häufigkeit körperl. anstrengender Aktivitäten",
    "Schalfstunden unter der Woche",
    "Schalfstunden am Wochenende",
    "Energy (kcal)",
    "Total sugars (gm)",
    "Total fat (gm)",
    "Dietary fiber (gm)",
    "Protein (gm)",
    "Cholesterol (mg)",
];

/// Biological sex as coded in the survey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Survey code (male 1, female 2)
    #[must_use]
    pub fn code(&self) -> f64 {
        match self {
            Self::Male => 1.0,
            Self::Female => 2.0,
        }
    }
}

/// Highest school or university degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Education {
    /// Hauptschule
    LowerSecondary,
    /// Realschule
    IntermediateSecondary,
    /// Abitur
    UpperSecondary,
    /// Studium abgebrochen
    SomeCollege,
    /// Universitärer Abschluss
    University,
}

impl Education {
    /// Survey code, 1 to 5
    #[must_use]
    pub fn code(&self) -> f64 {
        match self {
            Self::LowerSecondary => 1.0,
            Self::IntermediateSecondary => 2.0,
            Self::UpperSecondary => 3.0,
            Self::SomeCollege => 4.0,
            Self::University => 5.0,
        }
    }

    /// German form label
    #[must_use]
    pub fn german_label(&self) -> &'static str {
        match self {
            Self::LowerSecondary => "Hauptschule",
            Self::IntermediateSecondary => "Realschule",
            Self::UpperSecondary => "Abitur",
            Self::SomeCollege => "Studium abgebrochen",
            Self::University => "Universitärer Abschluss",
        }
    }
}

/// Marital status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyStatus {
    /// Verheiratet/Lebensgemeinschaft
    Partnered,
    /// Geschieden/Getrennt/Verwitwet
    Separated,
    /// Ledig
    Single,
}

impl FamilyStatus {
    /// Survey code, 1 to 3
    #[must_use]
    pub fn code(&self) -> f64 {
        match self {
            Self::Partnered => 1.0,
            Self::Separated => 2.0,
            Self::Single => 3.0,
        }
    }
}

/// Self-assessed household income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeBracket {
    /// Unter Armutsgrenze
    BelowPovertyLine,
    /// Nahe Armutsgrenze
    NearPovertyLine,
    /// Mittleres Einkommen
    Middle,
    /// Überdurchschnittliches Einkommen
    AboveAverage,
    /// Hohes Einkommen
    High,
}

impl IncomeBracket {
    /// Representative ratio of family income to the poverty line
    #[must_use]
    pub fn poverty_ratio(&self) -> f64 {
        match self {
            Self::BelowPovertyLine => 0.8,
            Self::NearPovertyLine => 1.2,
            Self::Middle => 2.5,
            Self::AboveAverage => 4.0,
            Self::High => 5.0,
        }
    }
}

/// Daily nutrient intake
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionInput {
    pub energy_kcal: f64,
    pub sugar_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub protein_g: f64,
    pub cholesterol_mg: f64,
}

impl NutritionInput {
    /// Population averages used when no nutrition data is given
    pub const POPULATION_AVERAGE: Self = Self {
        energy_kcal: 1926.73,
        sugar_g: 89.9,
        fat_g: 80.7,
        fiber_g: 15.41,
        protein_g: 71.56,
        cholesterol_mg: 276.7,
    };

    fn validate(&self) -> Result<(), ModelError> {
        check_range("energy_kcal", self.energy_kcal, 500.0, 5000.0)?;
        check_range("sugar_g", self.sugar_g, 0.0, 500.0)?;
        check_range("fat_g", self.fat_g, 0.0, 300.0)?;
        check_range("fiber_g", self.fiber_g, 0.0, 80.0)?;
        check_range("protein_g", self.protein_g, 0.0, 200.0)?;
        check_range("cholesterol_mg", self.cholesterol_mg, 0.0, 1000.0)
    }
}

impl Default for NutritionInput {
    fn default() -> Self {
        Self::POPULATION_AVERAGE
    }
}

/// Personal health and lifestyle attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskInput {
    pub age: u32,
    pub sex: Sex,
    pub education: Education,
    pub family_status: FamilyStatus,
    pub income: IncomeBracket,

    pub weight_kg: f64,
    pub height_cm: f64,
    pub hip_circumference_cm: f64,

    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    pub pulse: f64,

    #[serde(default)]
    pub asthma: bool,
    #[serde(default)]
    pub copd: bool,
    #[serde(default)]
    pub arthritis: bool,
    #[serde(default)]
    pub heart_attack: bool,
    #[serde(default)]
    pub stroke: bool,
    #[serde(default)]
    pub thyroid_problems: bool,
    #[serde(default)]
    pub depressive_symptoms: bool,

    /// At least 100 cigarettes smoked in life
    #[serde(default)]
    pub smoked_100_cigarettes: bool,
    #[serde(default)]
    pub ever_drank_alcohol: bool,
    /// 0 = never, 10 = very often
    #[serde(default)]
    pub alcohol_frequency: u32,
    #[serde(default)]
    pub daily_drinking_periods: bool,

    /// Days per week
    #[serde(default)]
    pub moderate_activity_days: u32,
    /// Minutes per day
    #[serde(default)]
    pub moderate_activity_minutes: u32,
    /// Days per week
    #[serde(default)]
    pub vigorous_activity_days: u32,
    /// Hours per day
    #[serde(default)]
    pub sitting_hours: u32,

    #[serde(default)]
    pub sleep_trouble: bool,
    pub sleep_hours_weekdays: f64,
    pub sleep_hours_weekend: f64,

    /// Falls back to population averages when absent
    #[serde(default)]
    pub nutrition: Option<NutritionInput>,
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ModelError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ModelError::InvalidInput {
            field,
            value,
            min,
            max,
        })
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

impl RiskInput {
    /// Body mass index from weight and height
    #[must_use]
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        self.weight_kg / (height_m * height_m)
    }

    /// Nutrition values, population averages if none were given
    #[must_use]
    pub fn nutrition_or_default(&self) -> NutritionInput {
        self.nutrition.unwrap_or_default()
    }

    /// Check every attribute against the accepted input ranges
    pub fn validate(&self) -> Result<(), ModelError> {
        check_range("age", f64::from(self.age), 18.0, 90.0)?;
        check_range("weight_kg", self.weight_kg, 40.0, 200.0)?;
        check_range("height_cm", self.height_cm, 140.0, 220.0)?;
        check_range("hip_circumference_cm", self.hip_circumference_cm, 60.0, 180.0)?;
        check_range("systolic_bp", self.systolic_bp, 80.0, 220.0)?;
        check_range("diastolic_bp", self.diastolic_bp, 40.0, 140.0)?;
        check_range("pulse", self.pulse, 40.0, 140.0)?;
        check_range("alcohol_frequency", f64::from(self.alcohol_frequency), 0.0, 10.0)?;
        check_range("moderate_activity_days", f64::from(self.moderate_activity_days), 0.0, 7.0)?;
        check_range(
            "moderate_activity_minutes",
            f64::from(self.moderate_activity_minutes),
            0.0,
            300.0,
        )?;
        check_range("vigorous_activity_days", f64::from(self.vigorous_activity_days), 0.0, 7.0)?;
        check_range("sitting_hours", f64::from(self.sitting_hours), 0.0, 16.0)?;
        check_range("sleep_hours_weekdays", self.sleep_hours_weekdays, 3.0, 12.0)?;
        check_range("sleep_hours_weekend", self.sleep_hours_weekend, 3.0, 12.0)?;
        if let Some(nutrition) = &self.nutrition {
            nutrition.validate()?;
        }
        Ok(())
    }

    /// Encode into the ordered feature vector
    #[must_use]
    pub fn to_features(&self) -> FeatureVector {
        let n = self.nutrition_or_default();
        FeatureVector {
            values: [
                f64::from(self.age),
                self.sex.code(),
                self.education.code(),
                self.family_status.code(),
                self.income.poverty_ratio(),
                flag(self.smoked_100_cigarettes),
                flag(self.ever_drank_alcohol),
                f64::from(self.alcohol_frequency),
                flag(self.daily_drinking_periods),
                f64::from(self.moderate_activity_days),
                f64::from(self.sitting_hours),
                flag(self.sleep_trouble),
                flag(self.asthma),
                flag(self.copd),
                flag(self.arthritis),
                flag(self.heart_attack),
                flag(self.stroke),
                flag(self.thyroid_problems),
                self.bmi(),
                flag(self.depressive_symptoms),
                self.hip_circumference_cm,
                self.weight_kg,
                self.pulse,
                self.systolic_bp,
                self.diastolic_bp,
                f64::from(self.moderate_activity_minutes),
                f64::from(self.vigorous_activity_days),
                self.sleep_hours_weekdays,
                self.sleep_hours_weekend,
                n.energy_kcal,
                n.sugar_g,
                n.fat_g,
                n.fiber_g,
                n.protein_g,
                n.cholesterol_mg,
            ],
        }
    }
}

/// Encoded model input, one value per entry of [`FEATURE_NAMES`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Values in feature order
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Value of a named feature
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.values[idx])
    }

    /// `(name, value)` pairs in feature order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
