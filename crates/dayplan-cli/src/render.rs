//! Human-readable rendering of a [`DailyPlan`].

use std::fmt::{self, Write};

use serde_json::Value;

use dayplan_core::DailyPlan;
use dayplan_core::json::is_set;
use dayplan_core::workout::{REST_DAY_MESSAGE, WorkoutSummary};

const RULE_WIDTH: usize = 50;

/// Render `plan` as the plain-text daily view.
pub fn render_plan(plan: &DailyPlan) -> String {
    let mut out = String::new();
    let _ = write_plan(&mut out, plan);
    out
}

/// Display form of a loose JSON scalar: strings unquoted, null as `?`.
fn text(value: &Value) -> String {
    match value {
        Value::Null => "?".to_owned(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&Value::Null)
}

fn text_or(value: &Value, key: &str, default: &str) -> String {
    match value.get(key) {
        Some(v) if is_set(v) => text(v),
        _ => default.to_owned(),
    }
}

fn items(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or_default()
}

fn write_plan(out: &mut impl Write, plan: &DailyPlan) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{rule}")?;
    writeln!(
        out,
        " DAILY PLAN FOR {} {}",
        plan.weekday.to_uppercase(),
        plan.date
    )?;
    writeln!(out, "{rule}")?;

    write_planner(out, plan)?;
    write_biometrics(out, plan)?;
    write_workout(out, plan)?;
    write_nutrition(out, plan)?;
    write_supplements(out, plan)
}

fn write_message(out: &mut impl Write, message: Option<&str>, fallback: &str) -> fmt::Result {
    writeln!(out, "  {}", message.unwrap_or(fallback))
}

fn write_planner(out: &mut impl Write, plan: &DailyPlan) -> fmt::Result {
    let Some(planner) = &plan.planner else {
        return Ok(());
    };
    writeln!(out, "\n[Planner]")?;
    if let Some(label) = &planner.label {
        writeln!(out, "  Plan: {label}")?;
    }
    if is_set(&planner.day_role) {
        writeln!(out, "  Day role: {}", text(&planner.day_role))?;
    }
    if is_set(&planner.notes) {
        writeln!(out, "  Notes: {}", text(&planner.notes))?;
    }
    Ok(())
}

fn write_biometrics(out: &mut impl Write, plan: &DailyPlan) -> fmt::Result {
    writeln!(out, "\n[Biometrics]")?;
    let Some(bio) = &plan.biometrics else {
        return write_message(out, plan.messages.biometrics.as_deref(), "");
    };
    writeln!(
        out,
        "  {}, {} yrs, {} cm, {} kg",
        text(&bio.sex),
        text(&bio.age),
        text(&bio.height_cm),
        text(&bio.weight_kg)
    )?;
    writeln!(out, "  Goal: {}", text(&bio.goal))?;
    if is_set(&bio.weekly_change_target) {
        writeln!(out, "  Weekly change target: {} kg", text(&bio.weekly_change_target))?;
    }
    if is_set(&bio.activity_level) || is_set(&bio.training_days_per_week) {
        writeln!(
            out,
            "  Activity: {}, {} training days/week",
            text(&bio.activity_level),
            text(&bio.training_days_per_week)
        )?;
    }
    Ok(())
}

fn write_workout(out: &mut impl Write, plan: &DailyPlan) -> fmt::Result {
    writeln!(out, "\n[Workout]")?;
    let Some(WorkoutSummary::Scheduled {
        focus,
        exercises,
        source,
    }) = &plan.workout
    else {
        return write_message(out, plan.messages.workout.as_deref(), REST_DAY_MESSAGE);
    };

    if let Some(source) = source {
        writeln!(out, "  Source: {source}")?;
    }
    writeln!(out, "  Focus: {}", text(focus))?;
    let exercises = items(exercises);
    if exercises.is_empty() {
        return writeln!(out, "  (No exercises listed for today.)");
    }
    for exercise in exercises {
        let name = text_or(exercise, "name", "Exercise");
        match exercise.get("duration").filter(|d| is_set(d)) {
            Some(duration) => writeln!(out, "   - {name}: {}", text(duration))?,
            None => writeln!(
                out,
                "   - {name}: {} x {}",
                text(field(exercise, "sets")),
                text(field(exercise, "reps"))
            )?,
        }
    }
    Ok(())
}

fn write_nutrition(out: &mut impl Write, plan: &DailyPlan) -> fmt::Result {
    writeln!(out, "\n[Nutrition]")?;
    let Some(nutrition) = &plan.nutrition else {
        return write_message(out, plan.messages.nutrition.as_deref(), "");
    };

    writeln!(out, "  Profile: {}", nutrition.profile_name)?;
    if let Some(label) = &nutrition.plan_label {
        writeln!(out, "  Plan: {label}")?;
    }
    if let Some(label) = &nutrition.day_type_label {
        writeln!(out, "  Day type: {label}")?;
    }
    if is_set(&nutrition.role) {
        writeln!(out, "  Role: {}", text(&nutrition.role))?;
    }
    if !nutrition.calories.is_null() {
        writeln!(out, "  Calories: {}", text(&nutrition.calories))?;
    }
    if is_set(&nutrition.macros) {
        let macros = &nutrition.macros;
        writeln!(
            out,
            "  Macros: P {}g | C {}g | F {}g",
            text(field(macros, "protein_g")),
            text(field(macros, "carbs_g")),
            text(field(macros, "fat_g"))
        )?;
    }

    let meals = items(&nutrition.meals);
    if meals.is_empty() {
        writeln!(out, "  (No meals listed for today.)")?;
    } else {
        writeln!(out, "  Meals:")?;
        for meal in meals {
            let name = text_or(meal, "name", "Meal");
            match meal.get("time").filter(|t| is_set(t)) {
                Some(time) => writeln!(out, "   - {} - {name}", text(time))?,
                None => writeln!(out, "   - {name}")?,
            }
        }
    }

    if is_set(&nutrition.notes) {
        writeln!(out, "  Notes: {}", text(&nutrition.notes))?;
    }
    Ok(())
}

fn write_supplements(out: &mut impl Write, plan: &DailyPlan) -> fmt::Result {
    writeln!(out, "\n[Supplements]")?;
    let Some(supplements) = &plan.supplements else {
        return write_message(out, plan.messages.supplements.as_deref(), "");
    };

    writeln!(out, "  Template: {}", supplements.template_name)?;
    if is_set(&supplements.day_type) {
        writeln!(out, "  Day type: {}", text(&supplements.day_type))?;
    }
    if !supplements.on.is_null() {
        let active = if is_set(&supplements.on) { "yes" } else { "no" };
        writeln!(out, "  Stack active today: {active}")?;
    }

    let protocol = items(&supplements.protocol);
    if protocol.is_empty() {
        writeln!(out, "  No protocol entries for this day.")?;
    }
    for block in protocol {
        writeln!(out, "   [{}]", text_or(block, "time", "Time not set"))?;
        for item in items(field(block, "items")) {
            let name = text_or(item, "name", "Supplement");
            let extra: Vec<String> = item
                .as_object()
                .into_iter()
                .flatten()
                .filter(|(key, _)| key.as_str() != "name")
                .map(|(key, value)| format!("{key}={}", text(value)))
                .collect();
            if extra.is_empty() {
                writeln!(out, "     - {name}")?;
            } else {
                writeln!(out, "     - {name} ({})", extra.join(", "))?;
            }
        }
    }

    if is_set(&supplements.notes) {
        writeln!(out, "  Notes: {}", text(&supplements.notes))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dayplan_core::{DocumentKind, DocumentSet, daily_plan};
    use serde_json::json;

    fn plan_for(documents: DocumentSet, day: u32) -> DailyPlan {
        daily_plan(&documents, NaiveDate::from_ymd_opt(2025, 11, day).unwrap())
    }

    #[test]
    fn empty_plan_prints_section_messages() {
        let out = render_plan(&plan_for(DocumentSet::new(), 3));
        assert!(out.contains(" DAILY PLAN FOR MONDAY 2025-11-03"), "{out}");
        assert!(!out.contains("[Planner]"));
        assert!(out.contains("No biometrics.json found or it's empty."));
        assert!(out.contains("No workout.json found or it's empty."));
        assert!(out.contains("No nutrition.json found or it's empty."));
        assert!(out.contains("No supplements.json found or it's empty."));
    }

    #[test]
    fn formats_exercises_meals_and_items() {
        let documents = DocumentSet::new()
            .with(
                DocumentKind::Workout,
                json!({"days": {"monday": {"focus": "Legs", "exercises": [
                    {"name": "Squat", "sets": 5, "reps": 5},
                    {"name": "Walk", "duration": "30 min"}
                ]}}}),
            )
            .unwrap()
            .with(
                DocumentKind::Nutrition,
                json!({"calories": 2000, "macros": {"protein_g": 150},
                       "meals": [{"time": "08:00", "name": "Oats"}, {"name": "Snack"}]}),
            )
            .unwrap()
            .with(
                DocumentKind::Supplements,
                json!({"days": {"monday": {"on": false, "protocol": [
                    {"time": "AM", "items": [{"name": "Creatine", "dose_g": 5, "form": "powder"}]},
                    {"items": [{"name": "Zinc"}]}
                ]}}}),
            )
            .unwrap();
        let out = render_plan(&plan_for(documents, 3));

        assert!(out.contains("  Source: monday\n"), "{out}");
        assert!(out.contains("   - Squat: 5 x 5\n"));
        assert!(out.contains("   - Walk: 30 min\n"));
        assert!(out.contains("  Calories: 2000\n"));
        assert!(out.contains("  Macros: P 150g | C ?g | F ?g\n"));
        assert!(out.contains("   - 08:00 - Oats\n"));
        assert!(out.contains("   - Snack\n"));
        assert!(out.contains("  Stack active today: no\n"));
        assert!(out.contains("     - Creatine (dose_g=5, form=powder)\n"));
        assert!(out.contains("   [Time not set]\n"));
        assert!(out.contains("     - Zinc\n"));
    }

    #[test]
    fn rest_day_uses_workout_message() {
        let documents = DocumentSet::new()
            .with(DocumentKind::Workout, json!({"days": {"monday": {"focus": "Push"}}}))
            .unwrap();
        let out = render_plan(&plan_for(documents, 4));
        assert!(out.contains(&format!("[Workout]\n  {REST_DAY_MESSAGE}\n")), "{out}");
    }
}
