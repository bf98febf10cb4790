use axum::Json;
use serde_json::{json, Value};
use shared::models::game::{Platform, DEFAULT_GENRE, DEFAULT_RATING, DEFAULT_YEAR};

fn game_properties(include_id: bool) -> Value {
    let platforms: Vec<&str> = Platform::ALL.iter().map(Platform::as_str).collect();
    let mut properties = json!({
        "title": {"type": "string"},
        "platform": {"type": "string", "enum": platforms},
        "genre": {"type": "string", "default": DEFAULT_GENRE},
        "year": {"type": "integer", "default": DEFAULT_YEAR},
        "rating": {"type": "integer", "default": DEFAULT_RATING},
        "picture": {
            "type": "string",
            "example": "https://upload.wikimedia.org/wikipedia/en/3/3b/Super_Mario_World_Coverart.png"
        }
    });
    if include_id {
        properties["id"] = json!({"type": "integer", "readOnly": true});
    }
    properties
}

fn json_content(schema: Value) -> Value {
    json!({"application/json": {"schema": schema}})
}

fn query_param(name: &str, description: &str, example: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "description": description,
        "schema": {"type": "string"},
        "example": example
    })
}

/// Hand-written OpenAPI 3.0 description of the game routes.
pub fn document() -> Value {
    let game = json!({"$ref": "#/components/schemas/Game"});
    let count = json!({"$ref": "#/components/schemas/Count"});
    let error = json_content(json!({"$ref": "#/components/schemas/Error"}));
    let id_param = json!({
        "name": "id", "in": "path", "required": true, "schema": {"type": "integer"}
    });
    let where_param = query_param(
        "where",
        "Optional predicate as a JSON string",
        r#"{"platform":"Super Nintendo (SNES)","year":1991}"#,
    );
    let filter_param = query_param(
        "filter",
        "Filter as a JSON string (where, order, limit, skip, fields)",
        r#"{"where":{"platform":"Super Nintendo (SNES)"},"limit":10,"skip":0,"order":["year DESC"]}"#,
    );
    let partial = json!({"type": "object", "properties": game_properties(false)});

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Retro Game API",
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": {
            "/games": {
                "post": {
                    "summary": "Create a new game",
                    "requestBody": {"content": json_content(json!({"$ref": "#/components/schemas/NewGame"}))},
                    "responses": {
                        "200": {"description": "Game model instance", "content": json_content(game.clone())},
                        "422": {"description": "Validation error", "content": error}
                    }
                },
                "get": {
                    "summary": "List games",
                    "parameters": [filter_param],
                    "responses": {
                        "200": {"description": "Array of Game model instances", "content": json_content(json!({"type": "array", "items": game}))},
                        "400": {"description": "Invalid filter", "content": error}
                    }
                },
                "patch": {
                    "summary": "Update multiple games",
                    "parameters": [where_param],
                    "requestBody": {"content": json_content(partial.clone())},
                    "responses": {
                        "200": {"description": "Game PATCH success count", "content": json_content(count.clone())},
                        "400": {"description": "Invalid where", "content": error}
                    }
                }
            },
            "/games/count": {
                "get": {
                    "summary": "Get game count",
                    "parameters": [where_param],
                    "responses": {
                        "200": {"description": "Game model count", "content": json_content(count)},
                        "400": {"description": "Invalid where", "content": error}
                    }
                }
            },
            "/games/{id}": {
                "get": {
                    "summary": "Get game by ID",
                    "parameters": [id_param, query_param("filter", "Filter without where", r#"{"fields":["title"]}"#)],
                    "responses": {
                        "200": {"description": "Game model instance", "content": json_content(game)},
                        "404": {"description": "Game not found", "content": error}
                    }
                },
                "patch": {
                    "summary": "Update game by ID",
                    "parameters": [id_param],
                    "requestBody": {"content": json_content(partial)},
                    "responses": {
                        "204": {"description": "Game PATCH success"},
                        "404": {"description": "Game not found", "content": error}
                    }
                },
                "put": {
                    "summary": "Replace game by ID",
                    "parameters": [id_param],
                    "requestBody": {"content": json_content(json!({"$ref": "#/components/schemas/Game"}))},
                    "responses": {
                        "204": {"description": "Game PUT success"},
                        "404": {"description": "Game not found", "content": error}
                    }
                },
                "delete": {
                    "summary": "Delete game by ID",
                    "parameters": [id_param],
                    "responses": {
                        "204": {"description": "Game DELETE success"},
                        "404": {"description": "Game not found", "content": error}
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Game": {
                    "type": "object",
                    "required": ["title"],
                    "additionalProperties": false,
                    "properties": game_properties(true)
                },
                "NewGame": {
                    "type": "object",
                    "required": ["title"],
                    "additionalProperties": false,
                    "properties": game_properties(false)
                },
                "Count": {
                    "type": "object",
                    "properties": {"count": {"type": "integer"}}
                },
                "Error": {
                    "type": "object",
                    "properties": {
                        "error": {
                            "type": "object",
                            "properties": {
                                "statusCode": {"type": "integer"},
                                "name": {"type": "string"},
                                "message": {"type": "string"}
                            }
                        }
                    }
                }
            }
        }
    })
}

pub async fn openapi_spec() -> Json<Value> {
    Json(document())
}
