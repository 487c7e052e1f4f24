pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>airpaint</title>
  <style>
    body { margin: 0; background: #111; color: #ddd; font-family: sans-serif; }
    main { display: flex; flex-direction: column; align-items: center; gap: 12px; padding: 16px; }
    img { max-width: 100%; border: 1px solid #333; }
    #status { font-family: monospace; font-size: 14px; }
  </style>
</head>
<body>
  <main>
    <h1>Air Canvas</h1>
    <img src="/video_feed" alt="live canvas">
    <div id="status">waiting for frames</div>
  </main>
  <script>
    const status = document.getElementById("status");
    async function poll() {
      try {
        const res = await fetch("/status");
        if (res.status === 200) {
          const s = await res.json();
          status.textContent =
            `frame ${s.frame_number} | ${s.fps.toFixed(1)} fps | ${s.color} | size ${s.thickness}` +
            (s.eraser ? " | eraser" : "") + ` | ${s.stroke_points} points | ${s.intent}`;
        }
      } catch (_) {}
      setTimeout(poll, 500);
    }
    poll();
  </script>
</body>
</html>
"#;
