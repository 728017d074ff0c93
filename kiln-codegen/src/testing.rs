//! Test fixtures shared by the code generators.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use eyre::{Result, eyre};
use kiln_manifest::{Mode, parse_manifest};
use kiln_model::Model;

use crate::CodegenContext;

/// A small REST service exercising every symbol stage: a required label,
/// an enum, a list, a recursive structure, an error and a streaming blob.
pub const WEATHER_MODEL: &str = r#"{
    "smithy": "2.0",
    "shapes": {
        "example.weather#Weather": {
            "type": "service",
            "version": "2006-03-01",
            "operations": [
                { "target": "example.weather#GetCity" },
                { "target": "example.weather#GetForecast" },
                { "target": "example.weather#ListCities" },
                { "target": "example.weather#GetCityImage" }
            ],
            "traits": {
                "aws.protocols#restJson1": {},
                "smithy.api#documentation": "Provides weather forecasts."
            }
        },
        "example.weather#GetCity": {
            "type": "operation",
            "input": { "target": "example.weather#GetCityInput" },
            "output": { "target": "example.weather#GetCityOutput" },
            "errors": [{ "target": "example.weather#NoSuchResource" }],
            "traits": {
                "smithy.api#http": { "method": "GET", "uri": "/cities/{cityId}" },
                "smithy.api#readonly": {}
            }
        },
        "example.weather#GetCityInput": {
            "type": "structure",
            "members": {
                "cityId": {
                    "target": "example.weather#CityId",
                    "traits": { "smithy.api#required": {} }
                }
            }
        },
        "example.weather#GetCityOutput": {
            "type": "structure",
            "members": {
                "name": { "target": "smithy.api#String", "traits": { "smithy.api#required": {} } },
                "coordinates": {
                    "target": "example.weather#CityCoordinates",
                    "traits": { "smithy.api#required": {} }
                }
            }
        },
        "example.weather#CityCoordinates": {
            "type": "structure",
            "members": {
                "latitude": { "target": "smithy.api#Float", "traits": { "smithy.api#required": {} } },
                "longitude": { "target": "smithy.api#Float", "traits": { "smithy.api#required": {} } }
            }
        },
        "example.weather#NoSuchResource": {
            "type": "structure",
            "members": {
                "resourceType": { "target": "smithy.api#String", "traits": { "smithy.api#required": {} } },
                "message": { "target": "smithy.api#String" }
            },
            "traits": { "smithy.api#error": "client" }
        },
        "example.weather#GetForecast": {
            "type": "operation",
            "input": { "target": "example.weather#GetForecastInput" },
            "output": { "target": "example.weather#GetForecastOutput" },
            "traits": {
                "smithy.api#http": { "method": "GET", "uri": "/cities/{cityId}/forecast" }
            }
        },
        "example.weather#GetForecastInput": {
            "type": "structure",
            "members": {
                "cityId": {
                    "target": "example.weather#CityId",
                    "traits": { "smithy.api#required": {} }
                },
                "unit": { "target": "example.weather#TemperatureUnit" }
            }
        },
        "example.weather#GetForecastOutput": {
            "type": "structure",
            "members": {
                "chanceOfRain": { "target": "smithy.api#Float" }
            }
        },
        "example.weather#TemperatureUnit": {
            "type": "enum",
            "members": {
                "CELSIUS": { "target": "smithy.api#Unit" },
                "FAHRENHEIT": { "target": "smithy.api#Unit" }
            }
        },
        "example.weather#ListCities": {
            "type": "operation",
            "input": { "target": "example.weather#ListCitiesInput" },
            "output": { "target": "example.weather#ListCitiesOutput" },
            "traits": {
                "smithy.api#http": { "method": "GET", "uri": "/cities?view=summary" }
            }
        },
        "example.weather#ListCitiesInput": {
            "type": "structure",
            "members": {
                "nextToken": { "target": "smithy.api#String" },
                "pageSize": { "target": "smithy.api#Integer" }
            }
        },
        "example.weather#ListCitiesOutput": {
            "type": "structure",
            "members": {
                "nextToken": { "target": "smithy.api#String" },
                "items": {
                    "target": "example.weather#CitySummaries",
                    "traits": { "smithy.api#required": {} }
                }
            }
        },
        "example.weather#CitySummaries": {
            "type": "list",
            "member": { "target": "example.weather#CitySummary" }
        },
        "example.weather#CitySummary": {
            "type": "structure",
            "members": {
                "cityId": {
                    "target": "example.weather#CityId",
                    "traits": { "smithy.api#required": {} }
                },
                "name": { "target": "smithy.api#String", "traits": { "smithy.api#required": {} } },
                "region": { "target": "example.weather#Region" }
            }
        },
        "example.weather#Region": {
            "type": "structure",
            "members": {
                "name": { "target": "smithy.api#String", "traits": { "smithy.api#required": {} } },
                "parent": { "target": "example.weather#Region" }
            }
        },
        "example.weather#GetCityImage": {
            "type": "operation",
            "input": { "target": "example.weather#GetCityImageInput" },
            "output": { "target": "example.weather#GetCityImageOutput" },
            "traits": {
                "smithy.api#http": { "method": "GET", "uri": "/cities/{cityId}/image" }
            }
        },
        "example.weather#GetCityImageInput": {
            "type": "structure",
            "members": {
                "cityId": {
                    "target": "example.weather#CityId",
                    "traits": { "smithy.api#required": {} }
                }
            }
        },
        "example.weather#GetCityImageOutput": {
            "type": "structure",
            "members": {
                "image": {
                    "target": "example.weather#CityImageData",
                    "traits": { "smithy.api#required": {} }
                }
            }
        },
        "example.weather#CityImageData": {
            "type": "blob",
            "traits": { "smithy.api#streaming": {} }
        },
        "example.weather#CityId": {
            "type": "string",
            "traits": { "smithy.api#pattern": "^[A-Za-z0-9 ]+$" }
        }
    }
}"#;

/// `kiln.toml` for [`WEATHER_MODEL`] in the given mode.
pub fn weather_manifest(mode: Mode) -> String {
    format!(
        r#"[codegen]
service = "example.weather#Weather"
model = "weather.json"
module-name = "weather-sdk"
module-description = "Weather service SDK"
mode = "{}"
"#,
        mode
    )
}

/// Build a context from a JSON model and a `kiln.toml`.
pub fn context_from(model_json: &str, manifest_toml: &str) -> Result<CodegenContext> {
    let manifest = parse_manifest(manifest_toml, "kiln.toml").map_err(|e| eyre!("{}", e))?;
    let model = Model::from_json_str(model_json)?;
    Ok(CodegenContext::new(model, &manifest))
}

pub fn weather_context(mode: Mode) -> Result<CodegenContext> {
    context_from(WEATHER_MODEL, &weather_manifest(mode))
}
