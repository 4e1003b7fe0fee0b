//! HTML view for the upload form.
//!
//! One view, two states: the bare form (GET, no submission yet) and the
//! form with a result line after a submission. Anything derived from
//! user input or artifacts is escaped.

use axum::response::Html;

/// Render the index view, optionally with a result line.
pub fn render_index(prediction: Option<&str>) -> Html<String> {
    let result_block = match prediction {
        Some(text) => format!(
            "\n    <p class=\"prediction\">{}</p>",
            html_escape::encode_text(text)
        ),
        None => String::new(),
    };

    Html(format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>papersort</title>
    <style>
      body {{ font-family: sans-serif; max-width: 40rem; margin: 4rem auto; }}
      .prediction {{ font-weight: bold; }}
    </style>
  </head>
  <body>
    <h1>PDF category classifier</h1>
    <form method="post" enctype="multipart/form-data">
      <input type="file" name="pdf" accept=".pdf">
      <button type="submit">Classify</button>
    </form>{result_block}
  </body>
</html>
"#
    ))
}
