mod calculator;
mod current_datetime;
mod current_weather;

use crate::types::ToolSet;

use calculator::Calculator;
use current_datetime::CurrentDateTime;
use current_weather::CurrentWeather;

// registration order is the order descriptors are advertised in
pub fn builtin_toolset() -> ToolSet {
    ToolSet::new()
        .add_tool::<Calculator>()
        .expect("calculator")
        .add_tool::<CurrentWeather>()
        .expect("current weather")
        .add_tool::<CurrentDateTime>()
        .expect("current datetime")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_holds_the_three_builtin_tools() {
        let names: Vec<_> = builtin_toolset()
            .descriptors(&[
                "calculator".to_string(),
                "current_weather".to_string(),
                "current_datetime".to_string(),
            ])
            .unwrap()
            .into_iter()
            .map(|descriptor| descriptor.function.name)
            .collect();
        assert_eq!(names, ["calculator", "current_weather", "current_datetime"]);
    }

    #[test]
    fn calculator_descriptor_requires_an_expression() {
        let descriptors = builtin_toolset()
            .descriptors(&["calculator".to_string()])
            .unwrap();
        assert_eq!(descriptors.len(), 1);
        let function = serde_json::to_value(&descriptors[0].function).unwrap();
        assert_eq!(function["name"], "calculator");
        assert_eq!(
            function["parameters"]["required"],
            serde_json::json!(["expression"])
        );
    }
}
