//! Diet plan templates.
//!
//! The daily calorie goal is derived from BMR and the BMI category:
//! - Overweight / Obese: 500 kcal deficit, never below 1200 kcal
//! - Underweight: 300 kcal surplus
//! - Normal: 200 kcal above BMR for maintenance

use crate::{BmiCategory, DietPlan};

const MIN_DAILY_KCAL: i32 = 1200;
const DEFICIT_KCAL: i32 = 500;
const GAIN_SURPLUS_KCAL: i32 = 300;
const MAINTENANCE_SURPLUS_KCAL: i32 = 200;

/// Age from which the higher-protein macro split applies
pub const SENIOR_AGE_YEARS: u32 = 50;

const DEFAULT_MACROS: &str = "Protein: 25%, Carbs: 45%, Fats: 30%";
const SENIOR_MACROS: &str =
    "Protein: 30%, Carbs: 40%, Fats: 30% (Higher protein supports muscle mass retention)";

/// Daily calorie goal for a category
pub fn daily_goal_kcal(category: BmiCategory, bmr: i32) -> i32 {
    match category {
        BmiCategory::Overweight | BmiCategory::Obese => {
            MIN_DAILY_KCAL.max(bmr.saturating_sub(DEFICIT_KCAL))
        }
        BmiCategory::Underweight => bmr.saturating_add(GAIN_SURPLUS_KCAL),
        BmiCategory::Normal => bmr.saturating_add(MAINTENANCE_SURPLUS_KCAL),
    }
}

/// Build the diet plan for a category, BMR and age
pub fn generate_diet_plan(category: BmiCategory, bmr: i32, age_years: u32) -> DietPlan {
    let goal = daily_goal_kcal(category, bmr);

    let (title, focus, suggestions): (String, String, [&str; 4]) = match category {
        BmiCategory::Overweight | BmiCategory::Obese => (
            format!("Weight Management Plan ({})", category),
            format!(
                "Your primary goal is to safely achieve a sustainable calorie deficit to promote \
                 weight loss. We estimate your daily goal to be {} kcal.",
                goal
            ),
            [
                "Prioritize lean proteins (chicken breast, fish, tofu) and high-fiber foods.",
                "Choose complex carbohydrates (oats, brown rice, whole wheat) over simple sugars.",
                "Focus on large portions of non-starchy vegetables at every meal.",
                "Drink plenty of water (2-3 liters) and limit sugary drinks.",
            ],
        ),
        BmiCategory::Underweight => (
            format!("Healthy Weight Gain Plan ({})", category),
            format!(
                "Your goal is to increase caloric intake safely and nutrient-densely to reach a \
                 healthy weight. We estimate your daily goal to be {} kcal.",
                goal
            ),
            [
                "Eat 5-6 smaller, frequent meals throughout the day.",
                "Incorporate healthy fats (nuts, seeds, avocado, olive oil) and starches (potatoes, sweet potatoes).",
                "Focus on protein and complex carbs post-workout to support muscle and mass gain.",
                "Use full-fat dairy or dairy alternatives for extra calories.",
            ],
        ),
        BmiCategory::Normal => (
            format!("Maintenance & Wellness Plan ({})", category),
            format!(
                "Continue your balanced eating habits to maintain your healthy weight. We \
                 estimate your daily goal to be around {} kcal.",
                goal
            ),
            [
                "Maintain diversity: eat a wide range of colorful fruits and vegetables.",
                "Balance protein, fats, and carbs in every meal.",
                "Limit processed snacks and excessive alcohol.",
                "Stay consistent with portion sizes based on your activity level.",
            ],
        ),
    };

    let macro_split = if age_years >= SENIOR_AGE_YEARS {
        SENIOR_MACROS
    } else {
        DEFAULT_MACROS
    };

    DietPlan {
        title,
        daily_goal_kcal: goal,
        focus,
        macro_split: macro_split.into(),
        suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deficit_for_overweight_and_obese() {
        assert_eq!(daily_goal_kcal(BmiCategory::Overweight, 2000), 1500);
        assert_eq!(daily_goal_kcal(BmiCategory::Obese, 2200), 1700);
    }

    #[test]
    fn test_deficit_floor() {
        assert_eq!(daily_goal_kcal(BmiCategory::Obese, 1500), 1200);
        assert_eq!(daily_goal_kcal(BmiCategory::Overweight, 1700), 1200);
        assert_eq!(daily_goal_kcal(BmiCategory::Overweight, 1701), 1201);
    }

    #[test]
    fn test_surplus_for_underweight_and_normal() {
        assert_eq!(daily_goal_kcal(BmiCategory::Underweight, 1400), 1700);
        assert_eq!(daily_goal_kcal(BmiCategory::Normal, 1649), 1849);
    }

    #[test]
    fn test_goal_saturates_at_extreme_bmr() {
        assert_eq!(daily_goal_kcal(BmiCategory::Obese, i32::MIN), MIN_DAILY_KCAL);
        assert_eq!(daily_goal_kcal(BmiCategory::Underweight, i32::MAX), i32::MAX);
        assert_eq!(daily_goal_kcal(BmiCategory::Normal, i32::MAX), i32::MAX);
    }

    #[test]
    fn test_plan_interpolates_goal() {
        let plan = generate_diet_plan(BmiCategory::Normal, 1649, 30);
        assert_eq!(plan.title, "Maintenance & Wellness Plan (Normal Weight)");
        assert_eq!(plan.daily_goal_kcal, 1849);
        assert!(plan.focus.contains("around 1849 kcal"));
        assert_eq!(plan.macro_split, DEFAULT_MACROS);
        assert_eq!(plan.suggestions.len(), 4);
    }

    #[test]
    fn test_weight_management_title_names_category() {
        let plan = generate_diet_plan(BmiCategory::Obese, 2100, 35);
        assert_eq!(plan.title, "Weight Management Plan (Obese)");
        assert!(plan.focus.contains("1600 kcal"));
        assert!(plan.suggestions[0].starts_with("Prioritize lean proteins"));
    }

    #[test]
    fn test_senior_macro_split() {
        assert_eq!(
            generate_diet_plan(BmiCategory::Underweight, 1300, 49).macro_split,
            DEFAULT_MACROS
        );
        assert_eq!(
            generate_diet_plan(BmiCategory::Underweight, 1300, 50).macro_split,
            SENIOR_MACROS
        );
    }
}
