//! Embedded upload page for the local single-user variant.

pub const UPLOAD_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>AudioGuard</title>
    <style>
        :root { --bg: #0d1117; --text: #c9d1d9; --text-muted: #8b949e; --blue: #58a6ff; --red: #f85149; --green: #3fb950; }
        body { font-family: -apple-system, sans-serif; background: var(--bg); color: var(--text); padding: 2rem; text-align: center; }
        h1 { margin-bottom: 0.5rem; }
        p { color: var(--text-muted); }
        .card { max-width: 28rem; margin: 2rem auto; padding: 2rem; border: 1px solid rgba(255,255,255,0.1); border-radius: 8px; }
        button { background: var(--blue); color: var(--bg); border: none; padding: 0.6rem 1.4rem; border-radius: 6px; font-size: 1rem; cursor: pointer; }
        #result { margin-top: 1.5rem; font-size: 1.1rem; }
        .fake { color: var(--red); }
        .real { color: var(--green); }
    </style>
</head>
<body>
    <h1>AudioGuard</h1>
    <p>Is this voice human or AI-generated?</p>
    <div class="card">
        <input type="file" id="audio" accept=".wav,.mp3,.m4a,.ogg,.flac,.webm">
        <button onclick="detect()">Detect</button>
        <div id="result"></div>
    </div>
    <script>
        async function detect() {
            const input = document.getElementById('audio');
            const result = document.getElementById('result');
            if (!input.files.length) { result.textContent = 'Pick a file first.'; return; }
            const form = new FormData();
            form.append('audio', input.files[0]);
            result.textContent = 'Analyzing...';
            try {
                const res = await fetch('/upload', { method: 'POST', body: form });
                const data = await res.json();
                if (data.status !== 'success') { result.textContent = data.message; return; }
                result.innerHTML = '<span class="' + data.result + '">' + data.detection_result +
                    '</span> (' + data.confidence_percent + ')';
            } catch (e) {
                result.textContent = 'Request failed: ' + e;
            }
        }
    </script>
</body>
</html>
"##;
